//! The operations the HTTP layer calls, composed from sessions, the
//! renderer and the export jobs.

use crate::config::ServerConfig;
use crate::error::{BadgeError, BadgeResult};
use crate::export::single_badge_pdf;
use crate::fonts::FontResolver;
use crate::job_controller::export::schedule_export_job;
use crate::render::{encode_png, render, Background};
use crate::session::{SessionStore, SharedSession};
use badge_common::jobs::ExportTaskStatus;
use badge_common::model::csv::Row;
use badge_common::model::template::Template;
use badge_common::requests::SingleFormat;
use md5::Context;
use std::sync::Arc;

/// What a preview renders.
#[derive(Debug, Clone)]
pub enum PreviewSource {
    /// A row of the session's CSV.
    Row(usize),
    /// Values typed in by hand; columns without a value show their name.
    Values(Row),
}

pub struct BadgeEngine {
    sessions: SessionStore,
    fonts: Arc<FontResolver>,
}

impl BadgeEngine {
    pub fn new(sessions: SessionStore, fonts: Arc<FontResolver>) -> Self {
        Self { sessions, fonts }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            SessionStore::new(config.max_sessions, config.max_tasks),
            Arc::new(FontResolver::system(&config.font_dirs)),
        )
    }

    pub fn fonts(&self) -> &Arc<FontResolver> {
        &self.fonts
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub async fn session(&self, token: &str) -> SharedSession {
        self.sessions.get(token).await
    }

    /// Renders one badge as PNG. Identical inputs hit the session's preview
    /// cache.
    pub async fn render_preview(
        &self,
        token: &str,
        source: PreviewSource,
    ) -> BadgeResult<Arc<Vec<u8>>> {
        let session = self.sessions.get(token).await;
        let (key, template, row, background) = {
            let mut state = session.lock().await;
            let row = match source {
                PreviewSource::Row(index) => {
                    if !state.csv().is_loaded() {
                        return Err(BadgeError::InvalidInput("No CSV loaded".to_string()));
                    }
                    state
                        .csv()
                        .row(index)
                        .cloned()
                        .ok_or_else(|| BadgeError::not_found("row", index))?
                }
                PreviewSource::Values(row) => row,
            };
            let template = state.template();
            let background = state.background().cloned();
            let key = preview_key(&template, &row, background.as_deref())?;
            if let Some(png) = state.previews().get(&key) {
                return Ok(png);
            }
            (key, template, row, background)
        };

        let fonts = self.fonts.clone();
        let png = tokio::task::spawn_blocking(move || -> BadgeResult<Vec<u8>> {
            let badge = render(
                &template.config,
                &template.fields,
                &row,
                background.as_deref().map(Background::bytes),
                &fonts,
            )?;
            encode_png(&badge)
        })
        .await
        .map_err(|e| BadgeError::Internal(format!("Task join error: {}", e)))??;

        let png = Arc::new(png);
        session.lock().await.previews().insert(key, png.clone());
        Ok(png)
    }

    /// Snapshots the session and starts a background export of every row.
    pub async fn start_export(&self, token: &str) -> BadgeResult<String> {
        let session = self.sessions.get(token).await;
        let (snapshot, registry) = {
            let state = session.lock().await;
            if !state.csv().is_loaded() {
                return Err(BadgeError::InvalidInput("No CSV loaded".to_string()));
            }
            (state.snapshot(), state.exports().clone())
        };
        Ok(schedule_export_job(&registry, snapshot, self.fonts.clone()).await)
    }

    pub async fn export_status(&self, token: &str, task_id: &str) -> BadgeResult<ExportTaskStatus> {
        let registry = self.sessions.get(token).await.lock().await.exports().clone();
        registry.status(task_id).await
    }

    pub async fn export_result(&self, token: &str, task_id: &str) -> BadgeResult<Arc<Vec<u8>>> {
        let registry = self.sessions.get(token).await.lock().await.exports().clone();
        registry.result(task_id).await
    }

    /// One row as a PNG or as a one-badge PDF.
    pub async fn render_single(
        &self,
        token: &str,
        index: usize,
        format: SingleFormat,
    ) -> BadgeResult<Vec<u8>> {
        let session = self.sessions.get(token).await;
        let (config, fields, row, background) = {
            let state = session.lock().await;
            if !state.csv().is_loaded() {
                return Err(BadgeError::InvalidInput("No CSV loaded".to_string()));
            }
            let row = state
                .csv()
                .row(index)
                .cloned()
                .ok_or_else(|| BadgeError::not_found("row", index))?;
            (
                state.config().clone(),
                state.fields().to_vec(),
                row,
                state.background().cloned(),
            )
        };

        let fonts = self.fonts.clone();
        tokio::task::spawn_blocking(move || {
            let background = background.as_deref().map(Background::bytes);
            let badge = render(&config, &fields, &row, background, &fonts)?;
            match format {
                SingleFormat::Image => encode_png(&badge),
                SingleFormat::Pdf => single_badge_pdf(&config, &badge),
            }
        })
        .await
        .map_err(|e| BadgeError::Internal(format!("Task join error: {}", e)))?
    }
}

/// Digest of every input of a render.
fn preview_key(template: &Template, row: &Row, background: Option<&Background>) -> BadgeResult<String> {
    let to_json = |e: serde_json::Error| BadgeError::Internal(format!("preview key: {}", e));
    let mut hasher = Context::new();
    hasher.consume(serde_json::to_vec(template).map_err(to_json)?);
    hasher.consume(b"\0");
    hasher.consume(serde_json::to_vec(row).map_err(to_json)?);
    hasher.consume(b"\0");
    if let Some(bg) = background {
        hasher.consume(bg.digest.as_bytes());
    }
    Ok(format!("{:x}", hasher.finalize()))
}
