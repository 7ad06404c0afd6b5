use crate::model::csv::Row;
use serde::{Deserialize, Serialize};

/// Metadata about the session's CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvInfo {
    pub loaded: bool,
    pub filename: Option<String>,
    pub headers: Vec<String>,
    pub row_count: usize,
    pub current_row: usize,
}

/// One row plus where it sits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowView {
    pub index: usize,
    pub total: usize,
    pub row: Row,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub index: usize,
    pub row: Row,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundInfo {
    pub has_background: bool,
    pub filename: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}
