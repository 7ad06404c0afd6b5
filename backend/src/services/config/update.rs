use crate::error::BadgeResult;
use crate::services::auth::SessionToken;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use badge_common::requests::ConfigUpdate;

pub(crate) async fn process(
    state: web::Data<AppState>,
    session: SessionToken,
    payload: web::Json<ConfigUpdate>,
) -> BadgeResult<HttpResponse> {
    let shared = state.engine.session(session.as_str()).await;
    let config = shared.lock().await.update_config(payload.into_inner())?;
    Ok(HttpResponse::Ok().json(config))
}
