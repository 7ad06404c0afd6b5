use crate::error::BadgeResult;
use crate::services::auth::SessionToken;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use badge_common::model::field::FieldPlacement;
use serde_json::json;

/// Appends a field; omitted properties take their defaults.
pub(crate) async fn process(
    state: web::Data<AppState>,
    session: SessionToken,
    payload: web::Json<FieldPlacement>,
) -> BadgeResult<HttpResponse> {
    let field = payload.into_inner();
    let shared = state.engine.session(session.as_str()).await;
    let index = shared.lock().await.add_field(field.clone())?;
    Ok(HttpResponse::Created().json(json!({ "index": index, "field": field })))
}
