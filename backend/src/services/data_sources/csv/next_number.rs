use crate::error::BadgeResult;
use crate::services::auth::SessionToken;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use badge_common::requests::NextNumberQuery;
use serde_json::json;

pub(crate) async fn process(
    state: web::Data<AppState>,
    session: SessionToken,
    query: web::Query<NextNumberQuery>,
) -> BadgeResult<HttpResponse> {
    let shared = state.engine.session(session.as_str()).await;
    let next = shared.lock().await.next_badge_number(&query.column);
    Ok(HttpResponse::Ok().json(json!({ "next": next })))
}
