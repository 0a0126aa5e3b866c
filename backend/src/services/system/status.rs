use actix_web::{HttpResponse, Responder};
use common::responses::StatusResponse;

/// Liveness check for clients waiting on the server to come up.
pub async fn process() -> impl Responder {
    HttpResponse::Ok().json(StatusResponse::ok())
}
