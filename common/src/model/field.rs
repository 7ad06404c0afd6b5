use serde::{Deserialize, Serialize};

/// Horizontal anchoring of a field's text relative to its `x` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// `x` is the left edge of each line.
    Left,
    /// `x` is the midpoint of each line.
    #[default]
    Center,
    /// `x` is the right edge of each line.
    Right,
}

/// One text element on the badge, bound to a CSV column.
///
/// The position is the top-left anchor in badge pixels; `max_width == 0`
/// disables wrapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPlacement {
    pub csv_column: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default = "default_font_color")]
    pub font_color: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default)]
    pub max_width: u32,
}

fn default_font_family() -> String {
    "Arial".to_string()
}

fn default_font_size() -> u32 {
    24
}

fn default_font_color() -> String {
    "#000000".to_string()
}

impl FieldPlacement {
    /// A field for `csv_column` at the origin with default styling.
    pub fn new(csv_column: impl Into<String>) -> Self {
        Self {
            csv_column: csv_column.into(),
            x: 0.0,
            y: 0.0,
            font_family: default_font_family(),
            font_size: default_font_size(),
            font_color: default_font_color(),
            bold: false,
            italic: false,
            alignment: Alignment::default(),
            max_width: 0,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn sized(mut self, font_size: u32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn colored(mut self, font_color: impl Into<String>) -> Self {
        self.font_color = font_color.into();
        self
    }

    pub fn wrapped(mut self, max_width: u32) -> Self {
        self.max_width = max_width;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_designer_defaults() {
        let field: FieldPlacement = serde_json::from_str(r#"{"csv_column": "Name"}"#).unwrap();
        assert_eq!(field, FieldPlacement::new("Name"));
        assert_eq!(field.alignment, Alignment::Center);
        assert_eq!(field.font_size, 24);
    }

    #[test]
    fn unknown_alignment_is_rejected() {
        let parsed = serde_json::from_str::<FieldPlacement>(
            r#"{"csv_column": "Name", "alignment": "justify"}"#,
        );
        assert!(parsed.is_err());
    }
}
