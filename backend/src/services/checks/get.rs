use crate::error::{ApiError, ApiResult};
use crate::server::AppState;
use crate::services::parse_identity;
use actix_web::{web, HttpResponse};
use common::model::check::Check;

/// Actix web handler for `GET /api/checks/{check_id}`.
///
/// A check whose blob no longer parses is reported as not found.
pub async fn process(
    state: web::Data<AppState>,
    check_id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_identity(&check_id)?;
    state
        .bridge
        .invoke_async(move |host| host.blobs().find::<Check>(id))
        .await??
        .map(|check| HttpResponse::Ok().json(check))
        .ok_or(ApiError::NotFound)
}
