use crate::error::BadgeResult;
use crate::services::auth::SessionToken;
use crate::state::AppState;
use actix_web::http::header::ContentDisposition;
use actix_web::{web, HttpResponse};

pub(crate) async fn process(
    state: web::Data<AppState>,
    session: SessionToken,
) -> BadgeResult<HttpResponse> {
    let shared = state.engine.session(session.as_str()).await;
    let (filename, body) = shared.lock().await.csv_download()?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition::attachment(filename))
        .body(body))
}
