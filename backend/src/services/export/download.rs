use crate::error::BadgeResult;
use crate::services::auth::SessionToken;
use crate::state::AppState;
use actix_web::http::header::ContentDisposition;
use actix_web::{web, HttpResponse};

const EXPORT_FILENAME: &str = "badges.pdf";

pub(crate) async fn process(
    state: web::Data<AppState>,
    session: SessionToken,
    task_id: web::Path<String>,
) -> BadgeResult<HttpResponse> {
    let pdf = state
        .engine
        .export_result(session.as_str(), &task_id)
        .await?;
    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition::attachment(EXPORT_FILENAME))
        .body(pdf.as_ref().clone()))
}
