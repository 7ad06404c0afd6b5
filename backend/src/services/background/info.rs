use crate::error::BadgeResult;
use crate::services::auth::SessionToken;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

pub(crate) async fn process(
    state: web::Data<AppState>,
    session: SessionToken,
) -> BadgeResult<HttpResponse> {
    let shared = state.engine.session(session.as_str()).await;
    let info = shared.lock().await.background_info();
    Ok(HttpResponse::Ok().json(info))
}
