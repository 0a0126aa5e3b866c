//! Endpoints that are not tied to a stored record.
//!
//! - `GET /api/status`: liveness, always `{"status":"ok"}`.
//! - `GET /api/user`: the operator name used in audit fields.
//! - `POST /api/select-elements`: asks the host to let the operator pick elements.
//! - `GET /api/diagnostics`: bridge traffic and skipped-record counters.

mod diagnostics;
mod selection;
mod status;
mod user;

use crate::services::not_found;
use actix_web::web::{self, get, post, resource, to};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        resource("/api/status")
            .route(get().to(status::process))
            .default_service(to(not_found)),
    )
    .service(
        resource("/api/user")
            .route(get().to(user::process))
            .default_service(to(not_found)),
    )
    .service(
        resource("/api/select-elements")
            .route(post().to(selection::process))
            .default_service(to(not_found)),
    )
    .service(
        resource("/api/diagnostics")
            .route(get().to(diagnostics::process))
            .default_service(to(not_found)),
    );
}
