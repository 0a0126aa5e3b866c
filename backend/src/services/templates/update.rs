//! # Template Update Service
//!
//! Backend logic for `PUT /api/templates/{template_id}`, and through `modify`
//! also for the archive endpoint.
//!
//! The editable fields (`name`, `description`, `sections`, `archived`) are
//! taken from the body. Identity, handle, version and the creation audit stay
//! as stored; the modification audit is refreshed.

use crate::error::{ApiError, ApiResult};
use crate::server::AppState;
use crate::services::parse_identity;
use crate::storage::blob_store::BlobStore;
use crate::storage::StorageResult;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use common::model::template::Template;
use uuid::Uuid;

/// Actix web handler for the `PUT /api/templates/{template_id}` endpoint.
///
/// # Arguments
/// * `template_id` - The template's `id`, extracted from the URL path.
/// * `payload` - The (partial) template holding the new field values.
///
/// # Returns
/// - `200 OK` with the updated `Template`, still under its original handle.
/// - `404 Not Found` if no readable template has that `id`.
pub async fn process(
    state: web::Data<AppState>,
    template_id: web::Path<String>,
    payload: web::Json<Template>,
) -> ApiResult<HttpResponse> {
    let id = parse_identity(&template_id)?;
    let edits = payload.into_inner();
    let by = state.username().await;
    let at = Utc::now();

    let updated = state
        .bridge
        .invoke_async(move |host| {
            modify(host.blobs(), id, &by, at, |template| {
                template.apply_edits(edits);
                template.canonicalize();
            })
        })
        .await??;

    match updated {
        Some(template) => Ok(HttpResponse::Ok().json(template)),
        None => Err(ApiError::NotFound),
    }
}

/// Looks up a template, applies `edit`, refreshes the modification audit and
/// saves it back under its existing handle. `None` if no template has `id`.
///
/// Runs entirely on the host context, so no other write can slip in between
/// the lookup and the save.
pub(super) fn modify(
    blobs: &mut BlobStore,
    id: Uuid,
    by: &str,
    at: DateTime<Utc>,
    edit: impl FnOnce(&mut Template),
) -> StorageResult<Option<Template>> {
    let Some(mut template) = blobs.find::<Template>(id)? else {
        return Ok(None);
    };
    edit(&mut template);
    template.stamp_modified(by, at);
    blobs.replace(&mut template)?;
    Ok(Some(template))
}
