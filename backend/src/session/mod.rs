//! Per-session designer state and the validated operations on it.
//!
//! Every method is synchronous; callers hold the session lock from
//! [`store::SessionStore`] for the duration of one operation, which keeps
//! field, row and config edits atomic with respect to each other.

pub mod csv_io;
pub mod preview;
pub mod store;

use crate::error::{BadgeError, BadgeResult};
use crate::export::grid::GridLayout;
use crate::export::ExportSnapshot;
use crate::job_controller::state::ExportRegistry;
use crate::render::background::MAX_BACKGROUND_PIXELS;
use crate::render::color::parse_color;
use crate::render::Background;
use badge_common::model::badge::BadgeConfig;
use badge_common::model::csv::{CsvData, Row};
use badge_common::model::field::FieldPlacement;
use badge_common::model::template::Template;
use badge_common::requests::{ConfigUpdate, FieldUpdate};
use badge_common::responses::{BackgroundInfo, CsvInfo, RowView, SearchHit};
use preview::PreviewCache;
use std::sync::Arc;

pub use store::{SessionStore, SharedSession};

pub struct SessionState {
    config: BadgeConfig,
    fields: Vec<FieldPlacement>,
    csv: CsvData,
    csv_filename: Option<String>,
    current_row: usize,
    background: Option<Arc<Background>>,
    exports: ExportRegistry,
    previews: PreviewCache,
}

impl SessionState {
    pub fn new(max_tasks: usize) -> Self {
        Self {
            config: BadgeConfig::default(),
            fields: Vec::new(),
            csv: CsvData::default(),
            csv_filename: None,
            current_row: 0,
            background: None,
            exports: ExportRegistry::new(max_tasks),
            previews: PreviewCache::default(),
        }
    }

    // ---- config ----

    pub fn config(&self) -> &BadgeConfig {
        &self.config
    }

    /// Applies the provided keys; nothing changes if the result is invalid.
    pub fn update_config(&mut self, update: ConfigUpdate) -> BadgeResult<BadgeConfig> {
        let mut config = self.config.clone();
        if let Some(v) = update.badge_width {
            config.badge_width = v;
        }
        if let Some(v) = update.badge_height {
            config.badge_height = v;
        }
        if let Some(v) = update.badges_per_row {
            config.badges_per_row = v;
        }
        if let Some(v) = update.badges_per_col {
            config.badges_per_col = v;
        }
        if let Some(v) = update.page_size {
            config.page_size = v;
        }
        if let Some(v) = update.margin_mm {
            config.margin_mm = v;
        }
        if let Some(v) = update.spacing_mm {
            config.spacing_mm = v;
        }
        validate_config(&config)?;
        self.config = config.clone();
        Ok(config)
    }

    // ---- fields ----

    pub fn fields(&self) -> &[FieldPlacement] {
        &self.fields
    }

    /// Appends a field on top of the others and returns its index.
    pub fn add_field(&mut self, field: FieldPlacement) -> BadgeResult<usize> {
        validate_field(&field)?;
        self.fields.push(field);
        Ok(self.fields.len() - 1)
    }

    pub fn update_field(&mut self, index: usize, update: FieldUpdate) -> BadgeResult<FieldPlacement> {
        let mut field = self
            .fields
            .get(index)
            .cloned()
            .ok_or_else(|| BadgeError::not_found("field", index))?;
        if let Some(v) = update.x {
            field.x = v;
        }
        if let Some(v) = update.y {
            field.y = v;
        }
        if let Some(v) = update.font_family {
            field.font_family = v;
        }
        if let Some(v) = update.font_size {
            field.font_size = v;
        }
        if let Some(v) = update.font_color {
            field.font_color = v;
        }
        if let Some(v) = update.bold {
            field.bold = v;
        }
        if let Some(v) = update.italic {
            field.italic = v;
        }
        if let Some(v) = update.alignment {
            field.alignment = v;
        }
        if let Some(v) = update.max_width {
            field.max_width = v;
        }
        validate_field(&field)?;
        self.fields[index] = field.clone();
        Ok(field)
    }

    pub fn delete_field(&mut self, index: usize) -> BadgeResult<FieldPlacement> {
        if index >= self.fields.len() {
            return Err(BadgeError::not_found("field", index));
        }
        Ok(self.fields.remove(index))
    }

    // ---- background ----

    pub fn background(&self) -> Option<&Arc<Background>> {
        self.background.as_ref()
    }

    /// Installs a decoded background and adopts its size as the badge size.
    pub fn set_background(&mut self, background: Background) -> BackgroundInfo {
        self.config.badge_width = background.width;
        self.config.badge_height = background.height;
        self.background = Some(Arc::new(background));
        self.background_info()
    }

    pub fn background_info(&self) -> BackgroundInfo {
        match &self.background {
            Some(bg) => BackgroundInfo {
                has_background: true,
                filename: Some(bg.filename.clone()),
                width: Some(bg.width),
                height: Some(bg.height),
            },
            None => BackgroundInfo {
                has_background: false,
                filename: None,
                width: None,
                height: None,
            },
        }
    }

    // ---- CSV ----

    pub fn csv(&self) -> &CsvData {
        &self.csv
    }

    pub fn current_row(&self) -> usize {
        self.current_row
    }

    pub fn csv_info(&self) -> CsvInfo {
        CsvInfo {
            loaded: self.csv.is_loaded(),
            filename: self.csv_filename.clone(),
            headers: self.csv.headers.clone(),
            row_count: self.csv.row_count(),
            current_row: self.current_row,
        }
    }

    /// Replaces the data with a freshly parsed upload.
    pub fn load_csv(&mut self, bytes: &[u8], filename: &str) -> BadgeResult<CsvInfo> {
        self.csv = csv_io::parse_csv(bytes)?;
        self.csv_filename = Some(filename.to_string());
        self.current_row = 0;
        Ok(self.csv_info())
    }

    /// The data as CSV bytes plus a download name.
    pub fn csv_download(&self) -> BadgeResult<(String, Vec<u8>)> {
        self.require_csv()?;
        let name = self
            .csv_filename
            .clone()
            .unwrap_or_else(|| "badges.csv".to_string());
        Ok((name, csv_io::write_csv(&self.csv)?))
    }

    fn require_csv(&self) -> BadgeResult<()> {
        if self.csv.is_loaded() {
            Ok(())
        } else {
            Err(BadgeError::InvalidInput("No CSV loaded".to_string()))
        }
    }

    /// Fetches a row and makes it the current one.
    pub fn row(&mut self, index: usize) -> BadgeResult<RowView> {
        self.require_csv()?;
        let row = self
            .csv
            .row(index)
            .cloned()
            .ok_or_else(|| BadgeError::not_found("row", index))?;
        self.current_row = index;
        Ok(RowView {
            index,
            total: self.csv.row_count(),
            row,
        })
    }

    /// Appends a row in header order. Missing columns become empty; with no
    /// headers yet, the row's own columns become the headers.
    pub fn add_row(&mut self, row: Row) -> BadgeResult<RowView> {
        if self.csv.headers.is_empty() {
            if row.is_empty() {
                return Err(BadgeError::InvalidInput("row has no columns".to_string()));
            }
            if row.columns().any(|c| c.trim().is_empty()) {
                return Err(BadgeError::InvalidInput(
                    "column names must not be empty".to_string(),
                ));
            }
            self.csv.headers = row.columns().map(str::to_string).collect();
        } else {
            self.check_columns(&row)?;
        }

        let ordered: Row = self
            .csv
            .headers
            .iter()
            .map(|h| (h.clone(), row.get(h).unwrap_or("").to_string()))
            .collect();
        self.csv.rows.push(ordered.clone());
        let index = self.csv.rows.len() - 1;
        self.current_row = index;
        Ok(RowView {
            index,
            total: self.csv.row_count(),
            row: ordered,
        })
    }

    /// Overwrites the provided cells of one row.
    pub fn update_row(&mut self, index: usize, cells: Row) -> BadgeResult<Row> {
        if index >= self.csv.row_count() {
            return Err(BadgeError::not_found("row", index));
        }
        self.check_columns(&cells)?;
        let row = &mut self.csv.rows[index];
        for (column, value) in cells.iter() {
            row.set(column, value);
        }
        Ok(row.clone())
    }

    /// Removes a row and keeps `current_row` in range. Returns the rows left.
    pub fn delete_row(&mut self, index: usize) -> BadgeResult<usize> {
        if index >= self.csv.row_count() {
            return Err(BadgeError::not_found("row", index));
        }
        self.csv.rows.remove(index);
        let remaining = self.csv.row_count();
        if remaining == 0 {
            self.current_row = 0;
        } else if self.current_row >= remaining {
            self.current_row = remaining - 1;
        }
        Ok(remaining)
    }

    fn check_columns(&self, row: &Row) -> BadgeResult<()> {
        match row.columns().find(|c| !self.csv.headers.iter().any(|h| h == c)) {
            Some(unknown) => Err(BadgeError::InvalidInput(format!(
                "unknown column '{}'",
                unknown
            ))),
            None => Ok(()),
        }
    }

    /// Rows with any cell containing `query`, case-insensitively.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.csv
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.iter().any(|(_, v)| v.to_lowercase().contains(&needle)))
            .map(|(index, row)| SearchHit {
                index,
                row: row.clone(),
            })
            .collect()
    }

    /// One more than the largest integer in `column`; 1 when there is none.
    pub fn next_badge_number(&self, column: &str) -> i64 {
        let highest = self
            .csv
            .rows
            .iter()
            .filter_map(|row| row.get(column))
            .filter_map(|v| v.trim().parse::<i64>().ok())
            .fold(0, i64::max);
        highest.saturating_add(1)
    }

    // ---- templates ----

    pub fn template(&self) -> Template {
        Template {
            config: self.config.clone(),
            fields: self.fields.clone(),
        }
    }

    /// Replaces config and fields after validating the whole template.
    pub fn import_template(&mut self, template: Template) -> BadgeResult<Template> {
        validate_config(&template.config)?;
        for (index, field) in template.fields.iter().enumerate() {
            validate_field(field)
                .map_err(|e| BadgeError::InvalidInput(format!("field {}: {}", index, e)))?;
        }
        self.config = template.config.clone();
        self.fields = template.fields.clone();
        Ok(template)
    }

    // ---- export & preview ----

    /// Copies everything an export reads.
    pub fn snapshot(&self) -> ExportSnapshot {
        ExportSnapshot {
            config: self.config.clone(),
            fields: self.fields.clone(),
            rows: self.csv.rows.clone(),
            background: self.background.clone(),
        }
    }

    pub fn exports(&self) -> &ExportRegistry {
        &self.exports
    }

    pub fn previews(&mut self) -> &mut PreviewCache {
        &mut self.previews
    }
}

pub fn validate_config(config: &BadgeConfig) -> BadgeResult<()> {
    if config.badge_width == 0 || config.badge_height == 0 {
        return Err(BadgeError::InvalidInput(
            "badge_width and badge_height must be positive".to_string(),
        ));
    }
    if u64::from(config.badge_width) * u64::from(config.badge_height) > MAX_BACKGROUND_PIXELS {
        return Err(BadgeError::InvalidInput(format!(
            "badge size {}x{} exceeds {} pixels",
            config.badge_width, config.badge_height, MAX_BACKGROUND_PIXELS
        )));
    }
    if !(config.margin_mm.is_finite() && config.margin_mm >= 0.0) {
        return Err(BadgeError::InvalidInput("margin_mm must be zero or more".to_string()));
    }
    if !(config.spacing_mm.is_finite() && config.spacing_mm >= 0.0) {
        return Err(BadgeError::InvalidInput("spacing_mm must be zero or more".to_string()));
    }
    GridLayout::new(config).map(|_| ())
}

pub fn validate_field(field: &FieldPlacement) -> BadgeResult<()> {
    if field.csv_column.trim().is_empty() {
        return Err(BadgeError::InvalidInput("csv_column must not be empty".to_string()));
    }
    if !(field.x.is_finite() && field.y.is_finite()) {
        return Err(BadgeError::InvalidInput("x and y must be finite".to_string()));
    }
    if field.font_size == 0 {
        return Err(BadgeError::InvalidInput("font_size must be positive".to_string()));
    }
    parse_color(&field.font_color).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use badge_common::model::badge::PageSize;
    use badge_common::model::field::Alignment;

    fn session_with_rows() -> SessionState {
        let mut session = SessionState::new(4);
        session
            .load_csv(
                b"Name,Company,Badge Number\nAda,Analytical Engines,126\nGrace,Navy,n/a\nAlan,Bletchley, 131 \n",
                "people.csv",
            )
            .unwrap();
        session
    }

    #[test]
    fn config_update_is_partial_and_atomic() {
        let mut session = SessionState::new(4);
        let updated = session
            .update_config(ConfigUpdate {
                badges_per_row: Some(3),
                page_size: Some(PageSize::A4),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(updated.badges_per_row, 3);
        assert_eq!(updated.badges_per_col, 4);
        assert_eq!(updated.page_size, PageSize::A4);

        let before = session.config().clone();
        let err = session
            .update_config(ConfigUpdate {
                badges_per_col: Some(2),
                badge_width: Some(0),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, BadgeError::InvalidInput(_)));
        assert_eq!(session.config(), &before);

        assert!(session
            .update_config(ConfigUpdate {
                margin_mm: Some(-1.0),
                ..Default::default()
            })
            .is_err());
        assert!(session
            .update_config(ConfigUpdate {
                margin_mm: Some(0.0),
                spacing_mm: Some(0.0),
                ..Default::default()
            })
            .is_ok());
    }

    #[test]
    fn field_indices_are_bounds_checked() {
        let mut session = SessionState::new(4);
        assert_eq!(session.add_field(FieldPlacement::new("Name")).unwrap(), 0);
        assert_eq!(session.add_field(FieldPlacement::new("Company")).unwrap(), 1);

        let err = session.update_field(2, FieldUpdate::default()).unwrap_err();
        assert!(matches!(err, BadgeError::NotFound { .. }));
        assert!(matches!(
            session.delete_field(5),
            Err(BadgeError::NotFound { .. })
        ));
        assert_eq!(session.fields().len(), 2);

        let moved = session
            .update_field(
                1,
                FieldUpdate {
                    x: Some(40.0),
                    alignment: Some(Alignment::Right),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(moved.x, 40.0);
        assert_eq!(moved.csv_column, "Company");
        assert_eq!(session.delete_field(0).unwrap().csv_column, "Name");
        assert_eq!(session.fields()[0].csv_column, "Company");
    }

    #[test]
    fn invalid_field_update_changes_nothing() {
        let mut session = SessionState::new(4);
        session.add_field(FieldPlacement::new("Name")).unwrap();
        let err = session
            .update_field(
                0,
                FieldUpdate {
                    x: Some(10.0),
                    font_color: Some("teal".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, BadgeError::InvalidInput(_)));
        assert_eq!(session.fields()[0], FieldPlacement::new("Name"));
        assert!(session.add_field(FieldPlacement::new("Name").sized(0)).is_err());
    }

    #[test]
    fn row_navigation_and_clamping() {
        let mut session = session_with_rows();
        assert_eq!(session.row(2).unwrap().row.get("Name"), Some("Alan"));
        assert_eq!(session.current_row(), 2);
        assert!(matches!(session.row(3), Err(BadgeError::NotFound { .. })));

        assert_eq!(session.delete_row(2).unwrap(), 2);
        assert_eq!(session.current_row(), 1);
        assert!(matches!(
            session.delete_row(9),
            Err(BadgeError::NotFound { .. })
        ));
        session.delete_row(0).unwrap();
        session.delete_row(0).unwrap();
        assert_eq!(session.current_row(), 0);
        assert!(session.csv().is_loaded());
    }

    #[test]
    fn rows_follow_the_headers() {
        let mut session = session_with_rows();
        let added = session
            .add_row([("Name", "Katherine")].into_iter().collect())
            .unwrap();
        assert_eq!(added.index, 3);
        assert_eq!(added.row.columns().collect::<Vec<_>>(), ["Name", "Company", "Badge Number"]);
        assert_eq!(added.row.get("Company"), Some(""));
        assert_eq!(session.current_row(), 3);

        let err = session
            .add_row([("Nickname", "Kat")].into_iter().collect())
            .unwrap_err();
        assert!(matches!(err, BadgeError::InvalidInput(_)));

        let updated = session
            .update_row(1, [("Company", "US Navy")].into_iter().collect())
            .unwrap();
        assert_eq!(updated.get("Name"), Some("Grace"));
        assert_eq!(updated.get("Company"), Some("US Navy"));
        assert!(session
            .update_row(1, [("Rank", "Admiral")].into_iter().collect())
            .is_err());
    }

    #[test]
    fn first_row_defines_headers() {
        let mut session = SessionState::new(4);
        let added = session
            .add_row([("Name", "Ada"), ("Title", "Countess")].into_iter().collect())
            .unwrap();
        assert_eq!(added.index, 0);
        assert_eq!(session.csv().headers, ["Name", "Title"]);
        assert!(session.csv_info().loaded);
    }

    #[test]
    fn search_and_next_number() {
        let session = session_with_rows();
        let hits = session.search("  ENGINE ");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].index, 0);
        assert!(session.search("").is_empty());
        assert_eq!(session.next_badge_number("Badge Number"), 132);
        assert_eq!(session.next_badge_number("Missing"), 1);
    }

    #[test]
    fn bad_template_changes_nothing() {
        let mut session = SessionState::new(4);
        session.add_field(FieldPlacement::new("Name")).unwrap();
        let before = session.template();

        let mut bad = before.clone();
        bad.fields.push(FieldPlacement::new("Company").colored("#zzz"));
        bad.config.badges_per_row = 5;
        assert!(session.import_template(bad).is_err());
        assert_eq!(session.template(), before);

        let mut good = before.clone();
        good.config.spacing_mm = 0.1 + 0.2;
        session.import_template(good.clone()).unwrap();
        assert_eq!(session.template(), good);
    }

    #[test]
    fn background_sets_badge_size() {
        let mut session = SessionState::new(4);
        let png = crate::render::encode_png(&image::RgbImage::new(300, 200)).unwrap();
        let info = session.set_background(Background::decode(png, "bg.png").unwrap());
        assert!(info.has_background);
        assert_eq!((session.config().badge_width, session.config().badge_height), (300, 200));
    }

    #[test]
    fn csv_download_requires_data() {
        let session = SessionState::new(4);
        assert!(matches!(
            session.csv_download(),
            Err(BadgeError::InvalidInput(_))
        ));
        let (name, bytes) = session_with_rows().csv_download().unwrap();
        assert_eq!(name, "people.csv");
        assert!(bytes.starts_with(b"Name,Company,Badge Number\n"));
    }
}
