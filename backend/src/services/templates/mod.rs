//! # Template Service Module
//!
//! All endpoints under `/api/templates`. Each handler turns the request into
//! a closure over the host's `BlobStore`, submits it through the bridge and
//! answers with the resulting template as JSON.
//!
//! ## Sub-modules:
//! - `list`: every stored template.
//! - `get`: one template by identity.
//! - `create`: assigns identity and audit fields, persists, returns the handle.
//! - `update`: overwrites the editable fields under the existing handle.
//! - `archive`: flips the `archived` flag through the same path as `update`.
//! - `delete`: removes the template's blob from the document.

mod archive;
mod create;
mod delete;
mod get;
mod list;
mod update;

use crate::services::not_found;
use actix_web::web::{delete, get, post, put, resource, scope, to};
use actix_web::Scope;

/// The base path for all template-related API endpoints.
const API_PATH: &str = "/api/templates";

/// Configures and returns the Actix `Scope` for all template-related routes.
///
/// # Registered Routes:
///
/// *   **`GET /`** → `list::process`: JSON array of every readable template.
/// *   **`POST /`** → `create::process`: expects a (partial) `Template` body and
///     answers with the persisted template, `id` and `dataStorageUniqueId` filled in.
/// *   **`GET /{template_id}`** → `get::process`: one template, or 404.
/// *   **`PUT /{template_id}`** → `update::process`: expects a (partial) `Template`
///     body; name, description, sections and archived are taken from it.
/// *   **`DELETE /{template_id}`** → `delete::process`: `{"status":"ok"}`, or 404.
/// *   **`POST /{template_id}/archive`** → `archive::process`: the archived template, or 404.
///
/// Any other method on these paths answers 404.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .service(
            resource("")
                .route(get().to(list::process))
                .route(post().to(create::process))
                .default_service(to(not_found)),
        )
        .service(
            resource("/{template_id}")
                .route(get().to(get::process))
                .route(put().to(update::process))
                .route(delete().to(delete::process))
                .default_service(to(not_found)),
        )
        .service(
            resource("/{template_id}/archive")
                .route(post().to(archive::process))
                .default_service(to(not_found)),
        )
}
