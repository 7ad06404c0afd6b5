//! # Export Service Module
//!
//! Batch exports run in the background; the client starts one, polls its status and
//! downloads the PDF once it is done.
//!
//! ## Routes
//!
//! *   **`POST /api/export`**: snapshots the session and starts rendering every CSV row.
//!     Returns `{ "task_id": ... }` immediately.
//! *   **`GET /api/export/{task_id}/status`**: progress, total and final state.
//! *   **`GET /api/export/{task_id}/download`**: the finished PDF. Answers 409 while the
//!     task is still running or after it failed.
//! *   **`GET /api/export/single/{row}?format=image|pdf`**: one row rendered synchronously.

mod download;
mod get_status;
mod single;
mod start;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/export";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(start::process))
        .route("/single/{row}", get().to(single::process))
        .route("/{task_id}/status", get().to(get_status::process))
        .route("/{task_id}/download", get().to(download::process))
}
