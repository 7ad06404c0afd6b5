use crate::error::BadgeResult;
use crate::services::auth::SessionToken;
use crate::state::AppState;
use actix_web::http::header::ContentDisposition;
use actix_web::{web, HttpResponse};
use badge_common::requests::{SingleExportQuery, SingleFormat};

/// Handler for `GET /api/export/single/{row}`.
///
/// Files are named after the 1-based row number, e.g. `badge_3.png`.
pub(crate) async fn process(
    state: web::Data<AppState>,
    session: SessionToken,
    index: web::Path<usize>,
    query: web::Query<SingleExportQuery>,
) -> BadgeResult<HttpResponse> {
    let index = index.into_inner();
    let format = query.format;
    let body = state
        .engine
        .render_single(session.as_str(), index, format)
        .await?;

    let (content_type, extension) = match format {
        SingleFormat::Image => ("image/png", "png"),
        SingleFormat::Pdf => ("application/pdf", "pdf"),
    };
    Ok(HttpResponse::Ok()
        .content_type(content_type)
        .insert_header(ContentDisposition::attachment(format!(
            "badge_{}.{}",
            index + 1,
            extension
        )))
        .body(body))
}
