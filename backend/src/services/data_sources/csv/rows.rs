use crate::error::BadgeResult;
use crate::services::auth::SessionToken;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use badge_common::requests::RowPayload;
use serde_json::json;

/// `GET /rows/{index}` also moves the session's current row.
pub(crate) async fn get(
    state: web::Data<AppState>,
    session: SessionToken,
    index: web::Path<usize>,
) -> BadgeResult<HttpResponse> {
    let shared = state.engine.session(session.as_str()).await;
    let view = shared.lock().await.row(index.into_inner())?;
    Ok(HttpResponse::Ok().json(view))
}

pub(crate) async fn add(
    state: web::Data<AppState>,
    session: SessionToken,
    payload: web::Json<RowPayload>,
) -> BadgeResult<HttpResponse> {
    let shared = state.engine.session(session.as_str()).await;
    let view = shared.lock().await.add_row(payload.into_inner().row)?;
    Ok(HttpResponse::Created().json(view))
}

pub(crate) async fn update(
    state: web::Data<AppState>,
    session: SessionToken,
    index: web::Path<usize>,
    payload: web::Json<RowPayload>,
) -> BadgeResult<HttpResponse> {
    let index = index.into_inner();
    let shared = state.engine.session(session.as_str()).await;
    let row = shared
        .lock()
        .await
        .update_row(index, payload.into_inner().row)?;
    Ok(HttpResponse::Ok().json(json!({ "index": index, "row": row })))
}

pub(crate) async fn remove(
    state: web::Data<AppState>,
    session: SessionToken,
    index: web::Path<usize>,
) -> BadgeResult<HttpResponse> {
    let shared = state.engine.session(session.as_str()).await;
    let remaining = shared.lock().await.delete_row(index.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "row_count": remaining })))
}
