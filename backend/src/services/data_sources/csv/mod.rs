//! CSV data source endpoints.
//!
//! The provided routes are:
//! - `POST /api/csv/upload`: multipart upload of a CSV file (`file` part). Replaces the
//!   session's rows and resets the current row.
//! - `GET /api/csv/info`: headers, row count and current row.
//! - `GET /api/csv/download`: the session's rows written back out as CSV.
//! - `GET|PUT|DELETE /api/csv/rows/{index}` and `POST /api/csv/rows`: row editing.
//! - `GET /api/csv/search?q=`: case-insensitive substring search over all cells.
//! - `GET /api/csv/next-badge-number?column=`: largest numeric value in a column plus one.

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

mod download;
mod info;
mod next_number;
mod rows;
mod search;
mod upload;

const API_PATH: &str = "/api/csv";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/upload", post().to(upload::process))
        .route("/info", get().to(info::process))
        .route("/download", get().to(download::process))
        .route("/rows", post().to(rows::add))
        .route("/rows/{index}", get().to(rows::get))
        .route("/rows/{index}", put().to(rows::update))
        .route("/rows/{index}", delete().to(rows::remove))
        .route("/search", get().to(search::process))
        .route("/next-badge-number", get().to(next_number::process))
}
