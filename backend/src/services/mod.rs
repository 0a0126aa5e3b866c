//! HTTP handlers, grouped by resource.
//!
//! - `templates`: `/api/templates` CRUD plus archive.
//! - `checks`: `/api/checks` CRUD.
//! - `system`: status, current user, element selection, diagnostics.
//!
//! Handlers never touch the host document directly. Every read and write is
//! a closure submitted through `AppState::bridge`, which runs it on the host
//! context and hands the result back.

pub mod checks;
pub mod system;
pub mod templates;

use crate::error::{ApiError, ApiResult};
use actix_web::HttpResponse;
use uuid::Uuid;

/// Fallback for every unmatched route, including a known path with the
/// wrong method.
pub async fn not_found() -> ApiResult<HttpResponse> {
    Err(ApiError::NotFound)
}

/// Parses an identity path segment. A segment that is not a UUID cannot
/// name any record, so it is reported as not found.
pub(crate) fn parse_identity(segment: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(segment).map_err(|_| ApiError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_uuid_segment_is_not_found() {
        assert!(matches!(parse_identity("abc"), Err(ApiError::NotFound)));
        let id = Uuid::new_v4();
        assert_eq!(parse_identity(&id.to_string()).unwrap(), id);
    }
}
