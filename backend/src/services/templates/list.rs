use crate::error::ApiResult;
use crate::server::AppState;
use actix_web::{web, HttpResponse};
use common::model::template::Template;

/// Actix web handler for `GET /api/templates`.
///
/// Unreadable blobs are left out of the array (and counted in the
/// diagnostics) rather than failing the request.
pub async fn process(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let templates = state
        .bridge
        .invoke_async(|host| host.blobs().list::<Template>())
        .await??;
    Ok(HttpResponse::Ok().json(templates))
}
