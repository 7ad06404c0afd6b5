//! Background image endpoints under `/api/background`.
//!
//! Uploading a background also sets the badge size to the image size.

mod get;
mod info;
mod upload;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/background";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(upload::process))
        .route("", get().to(get::process))
        .route("/info", get().to(info::process))
}
