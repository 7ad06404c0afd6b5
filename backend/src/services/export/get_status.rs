use crate::error::BadgeResult;
use crate::services::auth::SessionToken;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

pub(crate) async fn process(
    state: web::Data<AppState>,
    session: SessionToken,
    task_id: web::Path<String>,
) -> BadgeResult<HttpResponse> {
    let status = state
        .engine
        .export_status(session.as_str(), &task_id)
        .await?;
    Ok(HttpResponse::Ok().json(status))
}
