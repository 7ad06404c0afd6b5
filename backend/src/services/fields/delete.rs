use crate::error::BadgeResult;
use crate::services::auth::SessionToken;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde_json::json;

pub(crate) async fn process(
    state: web::Data<AppState>,
    session: SessionToken,
    idx: web::Path<usize>,
) -> BadgeResult<HttpResponse> {
    let shared = state.engine.session(session.as_str()).await;
    let mut current = shared.lock().await;
    let removed = current.delete_field(idx.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({
        "removed": removed,
        "fields": current.fields(),
    })))
}
