use crate::error::{ApiError, ApiResult};
use crate::server::AppState;
use crate::services::parse_identity;
use crate::services::templates::update::modify;
use actix_web::{web, HttpResponse};
use chrono::Utc;

/// Actix web handler for `POST /api/templates/{template_id}/archive`.
///
/// Archiving is a plain field update: the template stays in the document
/// and keeps showing up in listings with `archived: true`.
pub async fn process(
    state: web::Data<AppState>,
    template_id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_identity(&template_id)?;
    let by = state.username().await;
    let at = Utc::now();

    let archived = state
        .bridge
        .invoke_async(move |host| {
            modify(host.blobs(), id, &by, at, |template| template.archived = true)
        })
        .await??;

    match archived {
        Some(template) => {
            log::info!("Archived template {}", template.id);
            Ok(HttpResponse::Ok().json(template))
        }
        None => Err(ApiError::NotFound),
    }
}
