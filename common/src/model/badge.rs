use serde::{Deserialize, Serialize};

/// Default badge width in pixels (3.5" at 300 DPI).
pub const DEFAULT_BADGE_WIDTH: u32 = 1050;
/// Default badge height in pixels (2" at 300 DPI).
pub const DEFAULT_BADGE_HEIGHT: u32 = 600;

/// Paper size used when tiling badges into a PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    #[serde(rename = "letter", alias = "Letter", alias = "LETTER")]
    Letter,
    #[serde(rename = "A4", alias = "a4")]
    A4,
}

impl PageSize {
    /// Page dimensions in millimetres, portrait orientation.
    pub fn dimensions_mm(self) -> (f64, f64) {
        match self {
            PageSize::Letter => (215.9, 279.4),
            PageSize::A4 => (210.0, 297.0),
        }
    }
}

/// Badge canvas size plus the grid settings used for PDF export.
///
/// Missing keys take their defaults on deserialization so that older
/// templates keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeConfig {
    pub badge_width: u32,
    pub badge_height: u32,
    pub badges_per_row: u32,
    pub badges_per_col: u32,
    pub page_size: PageSize,
    pub margin_mm: f64,
    pub spacing_mm: f64,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            badge_width: DEFAULT_BADGE_WIDTH,
            badge_height: DEFAULT_BADGE_HEIGHT,
            badges_per_row: 2,
            badges_per_col: 4,
            page_size: PageSize::Letter,
            margin_mm: 10.0,
            spacing_mm: 2.0,
        }
    }
}

impl BadgeConfig {
    /// Number of grid cells on one PDF page.
    pub fn badges_per_page(&self) -> usize {
        self.badges_per_row as usize * self.badges_per_col as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_uses_legacy_names() {
        assert_eq!(serde_json::to_string(&PageSize::Letter).unwrap(), "\"letter\"");
        assert_eq!(serde_json::to_string(&PageSize::A4).unwrap(), "\"A4\"");
        let a4: PageSize = serde_json::from_str("\"a4\"").unwrap();
        assert_eq!(a4, PageSize::A4);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: BadgeConfig = serde_json::from_str(r#"{"badges_per_row": 3}"#).unwrap();
        assert_eq!(config.badges_per_row, 3);
        assert_eq!(config.badge_width, DEFAULT_BADGE_WIDTH);
        assert_eq!(config.badges_per_page(), 12);
    }
}
