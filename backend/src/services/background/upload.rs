use crate::error::{BadgeError, BadgeResult};
use crate::render::Background;
use crate::services::auth::SessionToken;
use crate::services::upload::read_file_field;
use crate::state::AppState;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use log::info;

/// `POST /api/background` with a multipart `file` part.
pub(crate) async fn process(
    state: web::Data<AppState>,
    session: SessionToken,
    payload: Multipart,
) -> BadgeResult<HttpResponse> {
    let upload = read_file_field(payload, state.config.upload_limit).await?;
    let filename = upload.filename.clone();

    // Decoding a large image is CPU-bound.
    let background = web::block(move || Background::decode(upload.bytes, upload.filename))
        .await
        .map_err(|e| BadgeError::Internal(format!("image decode: {}", e)))??;
    info!(
        "Session '{}' background '{}' is {}x{}",
        session.as_str(),
        filename,
        background.width,
        background.height
    );

    let shared = state.engine.session(session.as_str()).await;
    let info = shared.lock().await.set_background(background);
    Ok(HttpResponse::Ok().json(info))
}
