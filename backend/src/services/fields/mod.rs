//! Field list endpoints under `/api/fields`.
//!
//! A field's index in the list is both its id and its paint order: later
//! fields are drawn over earlier ones.

mod add;
mod delete;
mod list;
mod update;

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/fields";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(add::process))
        .route("/{idx}", put().to(update::process))
        .route("/{idx}", delete().to(delete::process))
}
