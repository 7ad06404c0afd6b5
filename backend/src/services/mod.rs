//! HTTP surface. Each group exposes a `configure_routes()` scope; handlers are
//! thin wrappers around [`crate::session::SessionState`] and
//! [`crate::engine::BadgeEngine`].

pub mod auth;
pub mod background;
pub mod config;
pub mod data_sources;
pub mod export;
pub mod fields;
pub mod fonts;
pub mod preview;
pub mod templates;
pub mod upload;

use crate::error::BadgeError;
use actix_web::web;

/// Registers every `/api` scope plus extractor settings, so that malformed
/// JSON, query strings and paths answer with the same error body as the
/// handlers do.
pub fn configure(cfg: &mut web::ServiceConfig, upload_limit: usize) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(upload_limit)
            .error_handler(|err, _req| BadgeError::InvalidInput(err.to_string()).into()),
    )
    .app_data(web::PayloadConfig::default().limit(upload_limit))
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| BadgeError::InvalidInput(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| BadgeError::InvalidInput(err.to_string()).into()),
    )
    .service(config::configure_routes())
    .service(fields::configure_routes())
    .service(fonts::configure_routes())
    .service(background::configure_routes())
    .service(data_sources::csv::configure_routes())
    .service(templates::configure_routes())
    .service(preview::configure_routes())
    .service(export::configure_routes());
}
