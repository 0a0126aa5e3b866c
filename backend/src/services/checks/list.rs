use crate::error::ApiResult;
use crate::server::AppState;
use actix_web::{web, HttpResponse};
use common::model::check::Check;

/// Actix web handler for `GET /api/checks`.
///
/// # Returns
/// - `200 OK` with a JSON array of every readable check, in document order.
pub async fn process(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let checks = state
        .bridge
        .invoke_async(|host| host.blobs().list::<Check>())
        .await??;
    Ok(HttpResponse::Ok().json(checks))
}
