use actix_web::{web, HttpResponse, Responder};

use super::model::{LoginRequest, LoginResponse};
use crate::AppState;

/// Check credentials against the configured user table
#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = LoginResponse)
    )
)]
pub async fn login(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> impl Responder {
    let (username, password) = body.credentials();

    if !username.is_empty() && state.authenticate(username, password) {
        log::info!("User {} logged in", username);
        HttpResponse::Ok().json(LoginResponse::accepted(username))
    } else {
        log::warn!("Rejected login for {:?}", username);
        HttpResponse::Unauthorized().json(LoginResponse::rejected())
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(login));
}
