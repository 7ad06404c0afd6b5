use crate::error::{BadgeError, BadgeResult};
use crate::services::auth::SessionToken;
use crate::state::AppState;
use actix_web::http::header::ContentDisposition;
use actix_web::{web, HttpResponse};

const TEMPLATE_FILENAME: &str = "badge_template.json";

pub(crate) async fn process(
    state: web::Data<AppState>,
    session: SessionToken,
) -> BadgeResult<HttpResponse> {
    let shared = state.engine.session(session.as_str()).await;
    let template = shared.lock().await.template();
    let body = serde_json::to_string_pretty(&template)
        .map_err(|e| BadgeError::Internal(format!("template serialization: {}", e)))?;
    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .insert_header(ContentDisposition::attachment(TEMPLATE_FILENAME))
        .body(body))
}
