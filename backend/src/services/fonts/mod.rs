//! `GET /api/fonts`: font families available to fields.

use crate::error::{BadgeError, BadgeResult};
use crate::services::auth::SessionToken;
use crate::state::AppState;
use actix_web::web::{get, scope};
use actix_web::{web, HttpResponse, Scope};

const API_PATH: &str = "/api/fonts";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", get().to(process))
}

async fn process(state: web::Data<AppState>, _session: SessionToken) -> BadgeResult<HttpResponse> {
    let fonts = state.engine.fonts().clone();
    // The first call scans the font directories.
    let families = web::block(move || fonts.families())
        .await
        .map_err(|e| BadgeError::Internal(format!("font discovery: {}", e)))?;
    Ok(HttpResponse::Ok().json(families))
}
