use crate::error::BadgeResult;
use crate::services::auth::SessionToken;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use badge_common::requests::StartExportResponse;

/// Handler for `POST /api/export`.
///
/// Edits made to the session after this returns do not reach the running
/// export; it works from a copy taken here.
pub(crate) async fn process(
    state: web::Data<AppState>,
    session: SessionToken,
) -> BadgeResult<HttpResponse> {
    let task_id = state.engine.start_export(session.as_str()).await?;
    Ok(HttpResponse::Accepted().json(StartExportResponse { task_id }))
}
