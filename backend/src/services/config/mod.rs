//! Badge configuration endpoints under `/api/config`.

mod get;
mod update;

use actix_web::web::{get, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/config";

/// - `GET /api/config`: the session's `BadgeConfig`.
/// - `PUT /api/config`: partial update; only the keys present in the body
///   change, and an invalid result is rejected as a whole.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(get::process))
        .route("", put().to(update::process))
}
