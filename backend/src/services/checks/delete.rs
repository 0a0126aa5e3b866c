use crate::error::{ApiError, ApiResult};
use crate::server::AppState;
use crate::services::parse_identity;
use crate::storage::StorageResult;
use actix_web::{web, HttpResponse};
use common::model::check::Check;
use common::responses::StatusResponse;

/// Actix web handler for `DELETE /api/checks/{check_id}`.
pub async fn process(
    state: web::Data<AppState>,
    check_id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_identity(&check_id)?;
    let removed = state
        .bridge
        .invoke_async(move |host| -> StorageResult<bool> {
            let blobs = host.blobs();
            match blobs.find::<Check>(id)? {
                Some(check) => blobs.remove(&check).map(|()| true),
                None => Ok(false),
            }
        })
        .await??;

    if !removed {
        return Err(ApiError::NotFound);
    }
    log::info!("Deleted check {}", id);
    Ok(HttpResponse::Ok().json(StatusResponse::ok()))
}
