//! # Element Selection Service
//!
//! Backend logic for `POST /api/select-elements`.
//!
//! The request names a prompt, how many elements to pick and optionally the
//! categories to restrict the pick to. The pick itself is done by the host's
//! `ElementPicker` on the host context, so this handler waits on the bridge
//! until the operator has finished. Any `count` other than `"multiple"` is a
//! single pick, and the host trims the answer to one id.

use crate::error::ApiResult;
use crate::server::AppState;
use actix_web::{web, HttpResponse};
use common::requests::SelectElementsRequest;
use common::responses::SelectElementsResponse;

/// Actix web handler for the `POST /api/select-elements` endpoint.
///
/// # Arguments
/// * `payload` - Prompt, count and optional allowed categories.
///
/// # Returns
/// - `200 OK` with `{"status":"ok","selectedElementUniqueIds":[...]}`; the
///   list is empty when the operator cancels.
/// - `500 Internal Server Error` if the host context is unavailable.
pub async fn process(
    state: web::Data<AppState>,
    payload: web::Json<SelectElementsRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let selected = state
        .bridge
        .invoke_async(move |host| host.pick_elements(&request))
        .await?;
    Ok(HttpResponse::Ok().json(SelectElementsResponse::ok(selected)))
}
