//! # Check Service Module
//!
//! All endpoints under `/api/checks`. A check carries a full snapshot of the
//! template it was created from, so none of these handlers ever read the
//! template itself.
//!
//! ## Sub-modules:
//! - `list`: every stored check.
//! - `get`: one check by identity.
//! - `create`: assigns identity, audit fields and the default `draft` status.
//! - `update`: overwrites answers, elements, snapshot and status in place.
//! - `delete`: removes the check's blob from the document.

mod create;
mod delete;
mod get;
mod list;
mod update;

use crate::services::not_found;
use actix_web::web::{delete, get, post, put, resource, scope, to};
use actix_web::Scope;
use common::model::check::Check;

const API_PATH: &str = "/api/checks";

/// Configures and returns the Actix `Scope` for all check-related routes.
///
/// # Registered Routes:
///
/// *   **`GET /`** → `list::process`
/// *   **`POST /`** → `create::process`: expects a (partial) `Check` body, typically
///     `{templateUniqueId, templateSnapshot, checkedElements, answers}`.
/// *   **`GET /{check_id}`** → `get::process`
/// *   **`PUT /{check_id}`** → `update::process`
/// *   **`DELETE /{check_id}`** → `delete::process`
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .service(
            resource("")
                .route(get().to(list::process))
                .route(post().to(create::process))
                .default_service(to(not_found)),
        )
        .service(
            resource("/{check_id}")
                .route(get().to(get::process))
                .route(put().to(update::process))
                .route(delete().to(delete::process))
                .default_service(to(not_found)),
        )
}

/// Logs answers pointing at items missing from the check's own snapshot.
/// They are stored as sent.
fn report_dangling_answers(check: &Check) {
    let dangling = check.dangling_answers().count();
    if dangling > 0 {
        log::debug!(
            "Check {} has {} answers without a matching snapshot item",
            check.id,
            dangling
        );
    }
}
