//! Badge previews under `/api/preview`, always returned as PNG.

use crate::engine::PreviewSource;
use crate::error::BadgeResult;
use crate::services::auth::SessionToken;
use crate::state::AppState;
use actix_web::web::{get, post, scope};
use actix_web::{web, HttpResponse, Scope};
use badge_common::model::csv::Row;

const API_PATH: &str = "/api/preview";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(values))
        .route("/{row}", get().to(row))
}

/// Preview of a loaded CSV row.
async fn row(
    state: web::Data<AppState>,
    session: SessionToken,
    index: web::Path<usize>,
) -> BadgeResult<HttpResponse> {
    let png = state
        .engine
        .render_preview(session.as_str(), PreviewSource::Row(index.into_inner()))
        .await?;
    Ok(png_response(&png))
}

/// Preview with values typed in by the client; no CSV is needed.
async fn values(
    state: web::Data<AppState>,
    session: SessionToken,
    values: web::Json<Row>,
) -> BadgeResult<HttpResponse> {
    let png = state
        .engine
        .render_preview(session.as_str(), PreviewSource::Values(values.into_inner()))
        .await?;
    Ok(png_response(&png))
}

fn png_response(png: &[u8]) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("image/png")
        .body(png.to_vec())
}
