use crate::error::{ApiError, ApiResult};
use crate::server::AppState;
use crate::services::parse_identity;
use crate::storage::blob_store::BlobStore;
use crate::storage::StorageResult;
use actix_web::{web, HttpResponse};
use common::model::template::Template;
use common::responses::StatusResponse;
use uuid::Uuid;

/// Actix web handler for `DELETE /api/templates/{template_id}`.
///
/// Checks created from the template keep their own snapshot and are not
/// touched.
///
/// # Returns
/// - `200 OK` with `{"status":"ok"}` once the blob is gone.
/// - `404 Not Found` if no readable template has that `id`.
pub async fn process(
    state: web::Data<AppState>,
    template_id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_identity(&template_id)?;
    let removed = state
        .bridge
        .invoke_async(move |host| remove(host.blobs(), id))
        .await??;

    if removed {
        log::info!("Deleted template {}", id);
        Ok(HttpResponse::Ok().json(StatusResponse::ok()))
    } else {
        Err(ApiError::NotFound)
    }
}

fn remove(blobs: &mut BlobStore, id: Uuid) -> StorageResult<bool> {
    match blobs.find::<Template>(id)? {
        Some(template) => {
            blobs.remove(&template)?;
            Ok(true)
        }
        None => Ok(false),
    }
}
