//! # Template Retrieval Service
//!
//! Backend logic for `GET /api/templates/{template_id}`.
//!
//! ## Workflow
//!
//! 1.  **Identity**: the path segment is parsed as a UUID. A segment that is not
//!     a UUID cannot name a template and is answered with `404 Not Found`.
//!
//! 2.  **Lookup**: a closure is submitted through the host bridge. On the host
//!     context it lists every template blob and picks the one with a matching
//!     `id`. Blobs that no longer parse are skipped, so a corrupt template
//!     reads as absent.
//!
//! 3.  **HTTP Response**: the template is returned as JSON with `200 OK`.

use crate::error::{ApiError, ApiResult};
use crate::server::AppState;
use crate::services::parse_identity;
use actix_web::{web, HttpResponse};
use common::model::template::Template;

/// Actix web handler for the `GET /api/templates/{template_id}` endpoint.
///
/// # Arguments
/// * `state` - Shared application state; only its bridge is used.
/// * `template_id` - The template's `id`, extracted from the URL path.
///
/// # Returns
/// - `200 OK` with the `Template` as a JSON payload.
/// - `404 Not Found` if no readable template has that `id`.
/// - `500 Internal Server Error` if the host context is unavailable or the
///   document cannot be read.
pub async fn process(
    state: web::Data<AppState>,
    template_id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_identity(&template_id)?;
    let template = state
        .bridge
        .invoke_async(move |host| host.blobs().find::<Template>(id))
        .await??;
    match template {
        Some(template) => Ok(HttpResponse::Ok().json(template)),
        None => Err(ApiError::NotFound),
    }
}
