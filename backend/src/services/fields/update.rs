use crate::error::BadgeResult;
use crate::services::auth::SessionToken;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use badge_common::requests::FieldUpdate;

pub(crate) async fn process(
    state: web::Data<AppState>,
    session: SessionToken,
    idx: web::Path<usize>,
    payload: web::Json<FieldUpdate>,
) -> BadgeResult<HttpResponse> {
    let shared = state.engine.session(session.as_str()).await;
    let field = shared
        .lock()
        .await
        .update_field(idx.into_inner(), payload.into_inner())?;
    Ok(HttpResponse::Ok().json(field))
}
