//! Tracks export tasks that run outside the request/response cycle.
//!
//! - `ExportRegistry`: clonable, lock-protected map of one session's tasks.
//!   Handlers read it for status polls; only the updater task writes to it.
//! - `JobUpdate`: message a worker sends about its task.
//! - `start_job_updater`: drains a task's channel into the registry.

use crate::error::{BadgeError, BadgeResult};
use badge_common::jobs::{ExportStatus, ExportTaskStatus};
use log::info;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// One export task and, once it is done, its PDF.
#[derive(Debug, Clone)]
pub struct ExportTask {
    pub task_id: String,
    pub status: ExportStatus,
    pub progress: usize,
    pub total: usize,
    pub error: Option<String>,
    result: Option<Arc<Vec<u8>>>,
    /// Registration order, used to pick eviction victims.
    seq: u64,
}

impl ExportTask {
    pub fn view(&self) -> ExportTaskStatus {
        ExportTaskStatus {
            task_id: self.task_id.clone(),
            status: self.status,
            progress: self.progress,
            total: self.total,
            error: self.error.clone(),
        }
    }
}

/// Status change reported by an export worker.
#[derive(Debug)]
pub enum JobUpdate {
    /// Rows finished so far.
    Progress(usize),
    Done(Vec<u8>),
    Failed(String),
}

#[derive(Debug, Default)]
struct Tasks {
    by_id: HashMap<String, ExportTask>,
    next_seq: u64,
}

#[derive(Debug, Clone)]
pub struct ExportRegistry {
    tasks: Arc<RwLock<Tasks>>,
    /// Retained tasks; running ones never count as evictable.
    capacity: usize,
}

impl ExportRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            tasks: Arc::new(RwLock::new(Tasks::default())),
            capacity: capacity.max(1),
        }
    }

    /// Registers a running task for `total` rows and returns its id. When the
    /// registry is full the oldest finished tasks make room first.
    pub async fn register(&self, total: usize) -> String {
        let mut tasks = self.tasks.write().await;

        while tasks.by_id.len() >= self.capacity {
            let oldest = tasks
                .by_id
                .values()
                .filter(|task| task.status.is_terminal())
                .min_by_key(|task| task.seq)
                .map(|task| task.task_id.clone());
            match oldest {
                Some(task_id) => {
                    tasks.by_id.remove(&task_id);
                    info!("Evicted finished export task {}", task_id);
                }
                None => break,
            }
        }

        let task_id = Uuid::new_v4().to_string();
        let seq = tasks.next_seq;
        tasks.next_seq += 1;
        tasks.by_id.insert(
            task_id.clone(),
            ExportTask {
                task_id: task_id.clone(),
                status: ExportStatus::Running,
                progress: 0,
                total,
                error: None,
                result: None,
                seq,
            },
        );
        task_id
    }

    /// Applies `update` unless the task is gone or already terminal.
    /// Progress never moves backwards. Returns whether anything changed.
    pub async fn apply(&self, task_id: &str, update: JobUpdate) -> bool {
        let mut tasks = self.tasks.write().await;
        let Some(task) = tasks.by_id.get_mut(task_id) else {
            return false;
        };
        if task.status.is_terminal() {
            return false;
        }

        match update {
            JobUpdate::Progress(done) => {
                let done = done.min(task.total);
                if done <= task.progress {
                    return false;
                }
                task.progress = done;
            }
            JobUpdate::Done(pdf) => {
                task.status = ExportStatus::Done;
                task.progress = task.total;
                task.result = Some(Arc::new(pdf));
            }
            JobUpdate::Failed(message) => {
                task.status = ExportStatus::Error;
                task.error = Some(message);
            }
        }
        true
    }

    pub async fn status(&self, task_id: &str) -> BadgeResult<ExportTaskStatus> {
        self.tasks
            .read()
            .await
            .by_id
            .get(task_id)
            .map(ExportTask::view)
            .ok_or_else(|| BadgeError::not_found("export task", task_id))
    }

    /// The finished PDF; `NotReady` while running or after a failure.
    pub async fn result(&self, task_id: &str) -> BadgeResult<Arc<Vec<u8>>> {
        let tasks = self.tasks.read().await;
        let task = tasks
            .by_id
            .get(task_id)
            .ok_or_else(|| BadgeError::not_found("export task", task_id))?;
        match (&task.status, &task.result) {
            (ExportStatus::Done, Some(pdf)) => Ok(pdf.clone()),
            (ExportStatus::Error, _) => Err(BadgeError::NotReady(format!(
                "export {} failed: {}",
                task_id,
                task.error.as_deref().unwrap_or("unknown error")
            ))),
            _ => Err(BadgeError::NotReady(format!(
                "export {} is still running ({}/{})",
                task_id, task.progress, task.total
            ))),
        }
    }

    pub async fn len(&self) -> usize {
        self.tasks.read().await.by_id.len()
    }
}

/// Listens for one task's updates until every sender is dropped.
pub async fn start_job_updater(
    registry: ExportRegistry,
    task_id: String,
    mut rx: mpsc::Receiver<JobUpdate>,
) {
    while let Some(update) = rx.recv().await {
        registry.apply(&task_id, update).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn progress_is_monotonic_and_capped() {
        let registry = ExportRegistry::new(4);
        let id = registry.register(5).await;

        assert!(registry.apply(&id, JobUpdate::Progress(2)).await);
        assert!(!registry.apply(&id, JobUpdate::Progress(1)).await);
        assert!(registry.apply(&id, JobUpdate::Progress(9)).await);

        let status = registry.status(&id).await.unwrap();
        assert_eq!(status.status, ExportStatus::Running);
        assert_eq!(status.progress, 5);
    }

    #[tokio::test]
    async fn terminal_tasks_are_immutable() {
        let registry = ExportRegistry::new(4);
        let id = registry.register(3).await;
        assert!(registry.apply(&id, JobUpdate::Done(b"%PDF-1.3".to_vec())).await);

        assert!(!registry.apply(&id, JobUpdate::Failed("late".into())).await);
        assert!(!registry.apply(&id, JobUpdate::Progress(1)).await);

        let status = registry.status(&id).await.unwrap();
        assert_eq!(status.status, ExportStatus::Done);
        assert_eq!(status.progress, 3);
        assert!(status.error.is_none());
        for _ in 0..3 {
            assert_eq!(registry.result(&id).await.unwrap().as_slice(), b"%PDF-1.3");
        }
    }

    #[tokio::test]
    async fn results_are_not_ready_until_done() {
        let registry = ExportRegistry::new(4);
        let running = registry.register(3).await;
        assert!(matches!(
            registry.result(&running).await,
            Err(BadgeError::NotReady(_))
        ));

        let failed = registry.register(3).await;
        registry
            .apply(&failed, JobUpdate::Failed("row 2: bad color".into()))
            .await;
        assert!(matches!(
            registry.result(&failed).await,
            Err(BadgeError::NotReady(_))
        ));
        assert_eq!(
            registry.status(&failed).await.unwrap().error.as_deref(),
            Some("row 2: bad color")
        );

        assert!(matches!(
            registry.status("nope").await,
            Err(BadgeError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn full_registry_evicts_oldest_finished_task() {
        let registry = ExportRegistry::new(2);
        let first = registry.register(1).await;
        let second = registry.register(1).await;
        registry.apply(&first, JobUpdate::Done(Vec::new())).await;
        registry.apply(&second, JobUpdate::Done(Vec::new())).await;

        let third = registry.register(1).await;
        assert!(registry.status(&first).await.is_err());
        assert!(registry.status(&second).await.is_ok());
        assert!(registry.status(&third).await.is_ok());
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn running_tasks_are_never_evicted() {
        let registry = ExportRegistry::new(1);
        let first = registry.register(1).await;
        let second = registry.register(1).await;
        assert!(registry.status(&first).await.is_ok());
        assert!(registry.status(&second).await.is_ok());
    }

    #[tokio::test]
    async fn updater_drains_the_channel() {
        let registry = ExportRegistry::new(2);
        let id = registry.register(2).await;
        let (tx, rx) = mpsc::channel(8);
        let listener = tokio::spawn(start_job_updater(registry.clone(), id.clone(), rx));

        tx.send(JobUpdate::Progress(1)).await.unwrap();
        tx.send(JobUpdate::Done(vec![1, 2, 3])).await.unwrap();
        drop(tx);
        listener.await.unwrap();

        let status = registry.status(&id).await.unwrap();
        assert_eq!(status.status, ExportStatus::Done);
        assert_eq!(status.progress, 2);
    }
}
