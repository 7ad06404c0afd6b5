use crate::error::{BadgeError, BadgeResult};
use crate::services::auth::SessionToken;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// The current background as PNG.
pub(crate) async fn process(
    state: web::Data<AppState>,
    session: SessionToken,
) -> BadgeResult<HttpResponse> {
    let shared = state.engine.session(session.as_str()).await;
    let background = shared
        .lock()
        .await
        .background()
        .cloned()
        .ok_or_else(|| BadgeError::not_found("background", session.as_str()))?;

    let png = web::block(move || background.to_png())
        .await
        .map_err(|e| BadgeError::Internal(format!("image encode: {}", e)))??;
    Ok(HttpResponse::Ok().content_type("image/png").body(png))
}
