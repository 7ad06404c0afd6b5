use crate::error::BadgeResult;
use crate::services::auth::SessionToken;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use badge_common::requests::SearchQuery;
use serde_json::json;

pub(crate) async fn process(
    state: web::Data<AppState>,
    session: SessionToken,
    query: web::Query<SearchQuery>,
) -> BadgeResult<HttpResponse> {
    let shared = state.engine.session(session.as_str()).await;
    let results = shared.lock().await.search(&query.q);
    Ok(HttpResponse::Ok().json(json!({ "results": results })))
}
