//! # Template Creation Service
//!
//! Backend logic for `POST /api/templates`.
//!
//! ## Workflow
//!
//! 1.  **Parsing**: the body is read as a (partial) `Template`. Missing or `null`
//!     fields take their defaults; a body that is not a JSON object of that shape
//!     is rejected with `400 Bad Request` by the JSON extractor.
//!
//! 2.  **Preparation**: `prepare` assigns a fresh `id`, clears any handle the
//!     client sent, resets `version` to 1, gives nil section and item ids a
//!     fresh identity and stamps the creation audit fields.
//!
//! 3.  **Persistence**: `persist` runs on the host context and writes the
//!     template as a new blob, capturing the handle the document assigns.
//!
//! 4.  **HTTP Response**: the stored template, `dataStorageUniqueId` filled in.

use crate::error::ApiResult;
use crate::server::AppState;
use crate::storage::blob_store::BlobStore;
use crate::storage::StorageResult;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use common::model::template::Template;
use uuid::Uuid;

/// Actix web handler for the `POST /api/templates` endpoint.
///
/// # Arguments
/// * `state` - Shared application state: the bridge and the operator name.
/// * `payload` - The (partial) template sent by the client.
///
/// # Returns
/// - `200 OK` with the persisted `Template`.
/// - `400 Bad Request` if the body is not a template.
/// - `500 Internal Server Error` if the host context or the document fails.
pub async fn process(
    state: web::Data<AppState>,
    payload: web::Json<Template>,
) -> ApiResult<HttpResponse> {
    let template = prepare(payload.into_inner(), &state.username().await, Utc::now());
    let template = state
        .bridge
        .invoke_async(move |host| persist(host.blobs(), template))
        .await??;
    log::info!(
        "Created template {} '{}' as {}",
        template.id,
        template.name,
        template.data_storage_unique_id
    );
    Ok(HttpResponse::Ok().json(template))
}

pub(crate) fn prepare(mut template: Template, by: &str, at: DateTime<Utc>) -> Template {
    template.id = Uuid::new_v4();
    template.data_storage_unique_id.clear();
    template.version = 1;
    template.canonicalize();
    template.stamp_created(by, at);
    template
}

fn persist(blobs: &mut BlobStore, mut template: Template) -> StorageResult<Template> {
    blobs.insert(&mut template)?;
    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::blob_store::tests::memory_store;

    #[test]
    fn prepare_resets_store_and_identity_fields() {
        let at = Utc::now();
        let body = Template {
            id: Uuid::new_v4(),
            data_storage_unique_id: "forged".into(),
            version: 9,
            name: "Fire Safety".into(),
            ..Template::default()
        };
        let original_id = body.id;

        let template = prepare(body, "alice", at);

        assert_ne!(template.id, original_id);
        assert!(template.data_storage_unique_id.is_empty());
        assert_eq!(template.version, 1);
        assert_eq!(template.created_by, "alice");
        assert_eq!(template.modified_by, "alice");
        assert_eq!(template.created_date, at);
        assert_eq!(template.modified_date, at);
    }

    #[test]
    fn persist_assigns_handle() {
        let mut blobs = memory_store();
        let template = persist(&mut blobs, prepare(Template::default(), "a", Utc::now())).unwrap();
        assert!(!template.data_storage_unique_id.is_empty());
    }
}
