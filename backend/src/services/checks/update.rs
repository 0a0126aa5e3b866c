//! # Check Update Service
//!
//! Backend logic for `PUT /api/checks/{check_id}`. Every mutable field
//! (`templateUniqueId`, `templateSnapshot`, `checkedElements`, `answers`,
//! `status`) is overwritten from the body, so a body without `status` puts the
//! check back to `draft`. Lookup and save run in one host action.

use crate::error::{ApiError, ApiResult};
use crate::server::AppState;
use crate::services::checks::report_dangling_answers;
use crate::services::parse_identity;
use crate::storage::blob_store::BlobStore;
use crate::storage::StorageResult;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use common::model::check::Check;
use uuid::Uuid;

/// Actix web handler for the `PUT /api/checks/{check_id}` endpoint.
///
/// # Arguments
/// * `check_id` - The check's `id`, extracted from the URL path.
/// * `payload` - The (partial) check holding the new field values.
///
/// # Returns
/// - `200 OK` with the updated `Check`, still under its original handle.
/// - `404 Not Found` if no readable check has that `id`.
pub async fn process(
    state: web::Data<AppState>,
    check_id: web::Path<String>,
    payload: web::Json<Check>,
) -> ApiResult<HttpResponse> {
    let id = parse_identity(&check_id)?;
    let edits = payload.into_inner();
    let by = state.username().await;
    let at = Utc::now();

    let updated = state
        .bridge
        .invoke_async(move |host| update_check(host.blobs(), id, edits, &by, at))
        .await??;

    match updated {
        Some(check) => {
            report_dangling_answers(&check);
            Ok(HttpResponse::Ok().json(check))
        }
        None => Err(ApiError::NotFound),
    }
}

fn update_check(
    blobs: &mut BlobStore,
    id: Uuid,
    edits: Check,
    by: &str,
    at: DateTime<Utc>,
) -> StorageResult<Option<Check>> {
    let Some(mut check) = blobs.find::<Check>(id)? else {
        return Ok(None);
    };
    check.apply_edits(edits);
    check.stamp_modified(by, at);
    blobs.replace(&mut check)?;
    Ok(Some(check))
}
