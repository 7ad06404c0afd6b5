//! # Template Service Module
//!
//! A template is the session's badge configuration plus its field list, without CSV
//! rows or background pixels.
//!
//! ## Routes
//!
//! *   **`GET /export`**: the current template as a pretty-printed JSON attachment.
//! *   **`POST /import`**: replaces the configuration and every field with the posted
//!     template. A template that fails validation leaves the session untouched.

mod export;
mod import;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/templates";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/export", get().to(export::process))
        .route("/import", post().to(import::process))
}
