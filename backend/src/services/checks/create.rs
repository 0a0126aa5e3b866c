//! # Check Creation Service
//!
//! Backend logic for `POST /api/checks`.
//!
//! ## Workflow
//!
//! 1.  **Parsing**: the body is read as a (partial) `Check`, typically carrying
//!     the template's handle, its snapshot, the checked elements and the
//!     initial answers.
//!
//! 2.  **Preparation**: a fresh `id` is assigned, any client handle is cleared,
//!     an empty status becomes `draft` and the creation audit is stamped.
//!     Answers that point at items missing from the snapshot are logged but kept.
//!
//! 3.  **Persistence**: the check is inserted as a new blob on the host context.
//!
//! 4.  **HTTP Response**: the stored check with its handle.

use crate::error::ApiResult;
use crate::server::AppState;
use crate::services::checks::report_dangling_answers;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use common::model::check::Check;
use uuid::Uuid;

/// Actix web handler for the `POST /api/checks` endpoint.
///
/// The template snapshot is stored exactly as sent; the referenced template
/// is not looked up.
///
/// # Returns
/// - `200 OK` with the persisted `Check`.
/// - `400 Bad Request` if the body is not a check.
pub async fn process(
    state: web::Data<AppState>,
    payload: web::Json<Check>,
) -> ApiResult<HttpResponse> {
    let mut check = prepare(payload.into_inner(), &state.username().await, Utc::now());
    report_dangling_answers(&check);

    let check = state
        .bridge
        .invoke_async(move |host| host.blobs().insert(&mut check).map(|()| check))
        .await??;
    log::info!(
        "Created check {} from template {} as {}",
        check.id,
        check.template_unique_id,
        check.data_storage_unique_id
    );
    Ok(HttpResponse::Ok().json(check))
}

fn prepare(mut check: Check, by: &str, at: DateTime<Utc>) -> Check {
    check.id = Uuid::new_v4();
    check.data_storage_unique_id.clear();
    check.normalize_status();
    check.stamp_created(by, at);
    check
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::check::{STATUS_COMPLETED, STATUS_DRAFT};

    #[test]
    fn prepare_defaults_status_and_stamps() {
        let at = Utc::now();
        let check = prepare(
            Check {
                status: String::new(),
                ..Check::default()
            },
            "carol",
            at,
        );

        assert!(!check.id.is_nil());
        assert_eq!(check.status, STATUS_DRAFT);
        assert_eq!(check.created_by, "carol");
        assert_eq!(check.modified_date, at);
    }

    #[test]
    fn prepare_keeps_explicit_status() {
        let check = prepare(
            Check {
                status: STATUS_COMPLETED.into(),
                ..Check::default()
            },
            "carol",
            Utc::now(),
        );
        assert_eq!(check.status, STATUS_COMPLETED);
    }
}
