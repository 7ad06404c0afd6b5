//! Scheduling of batch exports.
//!
//! `schedule_export_job` registers the task, then renders on tokio's blocking
//! pool. The worker reports each finished row over the task's own channel and
//! the final outcome goes over the same channel, so the updater sees them in
//! order.

use crate::export::{export_pdf, ExportSnapshot};
use crate::fonts::FontResolver;
use crate::job_controller::state::{start_job_updater, ExportRegistry, JobUpdate};
use log::{error, info};
use std::sync::Arc;
use tokio::sync::mpsc;

const UPDATE_BUFFER: usize = 100;

/// Starts exporting `snapshot` in the background and returns the task id
/// right away.
pub async fn schedule_export_job(
    registry: &ExportRegistry,
    snapshot: ExportSnapshot,
    fonts: Arc<FontResolver>,
) -> String {
    let total = snapshot.total();
    let task_id = registry.register(total).await;
    info!("Export {} started for {} rows", task_id, total);

    let (tx, rx) = mpsc::channel::<JobUpdate>(UPDATE_BUFFER);
    tokio::spawn(start_job_updater(registry.clone(), task_id.clone(), rx));

    let job_id = task_id.clone();
    tokio::spawn(async move {
        let progress_tx = tx.clone();
        let handle = tokio::task::spawn_blocking(move || {
            export_pdf(&snapshot, &fonts, |done| {
                let _ = progress_tx.blocking_send(JobUpdate::Progress(done));
            })
        });

        let update = match handle.await {
            Ok(Ok(pdf)) => {
                info!("Export {} finished: {} rows, {} bytes", job_id, total, pdf.len());
                JobUpdate::Done(pdf)
            }
            Ok(Err(e)) => {
                error!("Export {} failed: {}", job_id, e);
                JobUpdate::Failed(e.to_string())
            }
            Err(e) => {
                error!("Export {} worker died: {}", job_id, e);
                JobUpdate::Failed(format!("Task join error: {}", e))
            }
        };
        let _ = tx.send(update).await;
    });

    task_id
}
