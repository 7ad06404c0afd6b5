use crate::model::badge::PageSize;
use crate::model::csv::Row;
use crate::model::field::Alignment;
use serde::{Deserialize, Serialize};

/// Partial update of the badge configuration; absent keys keep their value.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConfigUpdate {
    pub badge_width: Option<u32>,
    pub badge_height: Option<u32>,
    pub badges_per_row: Option<u32>,
    pub badges_per_col: Option<u32>,
    pub page_size: Option<PageSize>,
    pub margin_mm: Option<f64>,
    pub spacing_mm: Option<f64>,
}

/// Partial update of one field. The bound column is fixed once the field
/// exists.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FieldUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub font_family: Option<String>,
    pub font_size: Option<u32>,
    pub font_color: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub alignment: Option<Alignment>,
    pub max_width: Option<u32>,
}

/// Body of the row add/update calls: `{"row": {"Name": "Ada", ...}}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RowPayload {
    #[serde(default)]
    pub row: Row,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NextNumberQuery {
    #[serde(default = "default_badge_number_column")]
    pub column: String,
}

fn default_badge_number_column() -> String {
    "Badge Number".to_string()
}

/// Output kind for a one-off single badge export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SingleFormat {
    #[default]
    Image,
    Pdf,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SingleExportQuery {
    #[serde(default)]
    pub format: SingleFormat,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StartExportResponse {
    pub task_id: String,
}
