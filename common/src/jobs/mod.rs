use serde::{Deserialize, Serialize};

/// Lifecycle of a batch export: `Running` moves to exactly one of the
/// terminal states and never leaves it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportStatus {
    Running,
    Done,
    Error,
}

impl ExportStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ExportStatus::Running)
    }
}

/// What a client sees when it polls an export task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTaskStatus {
    pub task_id: String,
    pub status: ExportStatus,
    /// Rows rendered so far.
    pub progress: usize,
    /// Rows to render, fixed when the task starts.
    pub total: usize,
    pub error: Option<String>,
}
