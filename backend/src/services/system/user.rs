use crate::server::AppState;
use actix_web::{web, HttpResponse, Responder};
use common::responses::UserResponse;

/// Actix web handler for `GET /api/user`.
///
/// Without a configured override the host is asked for the signed-in
/// operator, then the OS user is used.
pub async fn process(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(UserResponse {
        user: state.username().await,
    })
}
