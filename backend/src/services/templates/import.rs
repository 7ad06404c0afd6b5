use crate::error::{BadgeError, BadgeResult};
use crate::services::auth::SessionToken;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use badge_common::model::template::Template;
use log::info;

/// Takes the raw body so that files saved by hand or by the desktop
/// designer load regardless of the request's content type.
pub(crate) async fn process(
    state: web::Data<AppState>,
    session: SessionToken,
    body: web::Bytes,
) -> BadgeResult<HttpResponse> {
    let template: Template = serde_json::from_slice(&body)
        .map_err(|e| BadgeError::InvalidInput(format!("Invalid template: {}", e)))?;

    let shared = state.engine.session(session.as_str()).await;
    let imported = shared.lock().await.import_template(template)?;
    info!(
        "Session '{}' imported a template with {} fields",
        session.as_str(),
        imported.fields.len()
    );
    Ok(HttpResponse::Ok().json(imported))
}
