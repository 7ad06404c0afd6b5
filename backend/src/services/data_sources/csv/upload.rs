use crate::error::BadgeResult;
use crate::services::auth::SessionToken;
use crate::services::upload::read_file_field;
use crate::state::AppState;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use log::info;

/// Handles `POST /api/csv/upload`.
///
/// The file is parsed before the session is touched, so a rejected upload
/// leaves the previous rows in place.
pub(crate) async fn process(
    state: web::Data<AppState>,
    session: SessionToken,
    payload: Multipart,
) -> BadgeResult<HttpResponse> {
    let upload = read_file_field(payload, state.config.upload_limit).await?;
    let digest = md5::compute(&upload.bytes);

    let shared = state.engine.session(session.as_str()).await;
    let info = shared
        .lock()
        .await
        .load_csv(&upload.bytes, &upload.filename)?;
    info!(
        "Session '{}' loaded '{}' ({:x}): {} rows, {} columns",
        session.as_str(),
        upload.filename,
        digest,
        info.row_count,
        info.headers.len()
    );
    Ok(HttpResponse::Ok().json(info))
}
