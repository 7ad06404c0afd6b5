//! Error type shared by the rendering core, the export jobs and the HTTP
//! handlers.
//!
//! Core functions return [`BadgeResult`] and propagate with `?`; the actix
//! layer turns a [`BadgeError`] into a JSON body of the form
//! `{"error": "...", "code": "NOT_FOUND"}` through [`ResponseError`].

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum BadgeError {
    /// Unknown field, row or task index/id.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Malformed configuration, non-positive sizes, bad colors, bad uploads.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unreadable background image or unusable font data.
    #[error("Rendering failed: {0}")]
    RenderingFailure(String),

    /// A batch export aborted; carries the failure that stopped it.
    #[error("Export failed: {0}")]
    ExportFailure(String),

    /// The export exists but has no PDF to hand out.
    #[error("{0}")]
    NotReady(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type BadgeResult<T> = Result<T, BadgeError>;

impl BadgeError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        BadgeError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Stable machine-readable code used in the JSON error body.
    pub fn code(&self) -> &'static str {
        match self {
            BadgeError::NotFound { .. } => "NOT_FOUND",
            BadgeError::InvalidInput(_) => "INVALID_INPUT",
            BadgeError::RenderingFailure(_) => "RENDERING_FAILURE",
            BadgeError::ExportFailure(_) => "EXPORT_FAILURE",
            BadgeError::NotReady(_) => "NOT_READY",
            BadgeError::Unauthorized(_) => "UNAUTHORIZED",
            BadgeError::Forbidden(_) => "FORBIDDEN",
            BadgeError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for BadgeError {
    fn status_code(&self) -> StatusCode {
        match self {
            BadgeError::NotFound { .. } => StatusCode::NOT_FOUND,
            BadgeError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            BadgeError::RenderingFailure(_)
            | BadgeError::ExportFailure(_)
            | BadgeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BadgeError::NotReady(_) => StatusCode::CONFLICT,
            BadgeError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            BadgeError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        }
        HttpResponse::build(status).json(json!({
            "error": self.to_string(),
            "code": self.code(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_http_statuses() {
        assert_eq!(
            BadgeError::not_found("field", 3).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            BadgeError::InvalidInput("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            BadgeError::NotReady("later".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            BadgeError::ExportFailure("row 2".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_names_the_entity() {
        assert_eq!(BadgeError::not_found("row", 12).to_string(), "row 12 not found");
    }
}
