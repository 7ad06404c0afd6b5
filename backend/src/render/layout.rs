//! Field layout: turns one field and one value into positioned lines.
//!
//! Coordinates are badge pixels. `y` of a line is the top of its line box;
//! the renderer puts the baseline one ascender below it.

use crate::error::BadgeResult;
use crate::fonts::{FontResolver, ScaledFont};
use badge_common::model::field::{Alignment, FieldPlacement};
use serde::Serialize;

pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutResult {
    pub lines: Vec<LayoutLine>,
    pub bbox: BoundingBox,
    pub line_height: f32,
}

/// Resolves the field's font and lays `text` out with it.
pub fn layout(field: &FieldPlacement, text: &str, fonts: &FontResolver) -> BadgeResult<LayoutResult> {
    let handle = fonts.resolve(&field.font_family, field.bold, field.italic);
    let font = handle.scaled(field.font_size as f32)?;
    Ok(layout_with(field, text, &font))
}

pub fn layout_with(field: &FieldPlacement, text: &str, font: &ScaledFont<'_>) -> LayoutResult {
    let line_height = field.font_size as f32 * LINE_HEIGHT_FACTOR;
    let anchor_x = field.x as f32;
    let anchor_y = field.y as f32;

    // Explicit line breaks always start a new line, wrapped or not.
    let texts: Vec<String> = if text.is_empty() {
        Vec::new()
    } else if field.max_width == 0 {
        text.lines().map(without_controls).collect()
    } else {
        text.lines()
            .flat_map(|paragraph| {
                let wrapped = wrap(paragraph, field.max_width as f32, font);
                if wrapped.is_empty() {
                    vec![String::new()]
                } else {
                    wrapped
                }
            })
            .collect()
    };

    let lines: Vec<LayoutLine> = texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let width = font.measure(&text);
            let x = match field.alignment {
                Alignment::Left => anchor_x,
                Alignment::Center => anchor_x - width / 2.0,
                Alignment::Right => anchor_x - width,
            };
            LayoutLine {
                text,
                x,
                y: anchor_y + i as f32 * line_height,
                width,
            }
        })
        .collect();

    let bbox = if lines.is_empty() {
        BoundingBox {
            x: anchor_x,
            y: anchor_y,
            width: 0.0,
            height: line_height,
        }
    } else {
        let left = lines.iter().map(|l| l.x).fold(f32::INFINITY, f32::min);
        let right = lines
            .iter()
            .map(|l| l.x + l.width)
            .fold(f32::NEG_INFINITY, f32::max);
        BoundingBox {
            x: left,
            y: anchor_y,
            width: right - left,
            height: lines.len() as f32 * line_height,
        }
    };

    LayoutResult {
        lines,
        bbox,
        line_height,
    }
}

/// Tabs and other control characters have no glyph; draw them as spaces.
fn without_controls(line: &str) -> String {
    line.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Greedy word wrap. A word wider than `max_width` gets a line of its own.
fn wrap(text: &str, max_width: f32, font: &ScaledFont<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if font.measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(alignment: Alignment, max_width: u32) -> FieldPlacement {
        FieldPlacement::new("Name")
            .at(525.0, 100.0)
            .sized(24)
            .aligned(alignment)
            .wrapped(max_width)
    }

    fn lay(field: &FieldPlacement, text: &str) -> LayoutResult {
        layout(field, text, &FontResolver::builtin_only()).unwrap()
    }

    #[test]
    fn single_line_alignment() {
        let center = lay(&field(Alignment::Center, 0), "Ada Lovelace");
        let line = &center.lines[0];
        assert!((line.x + line.width / 2.0 - 525.0).abs() < 1e-3);
        assert_eq!(line.y, 100.0);

        let right = lay(&field(Alignment::Right, 0), "Ada Lovelace");
        let line = &right.lines[0];
        assert!((line.x + line.width - 525.0).abs() < 1e-3);

        let left = lay(&field(Alignment::Left, 0), "Ada Lovelace");
        assert_eq!(left.lines[0].x, 525.0);
        assert_eq!(left.lines.len(), 1);
    }

    #[test]
    fn wrapped_lines_fit_and_keep_every_word() {
        let text = "The quick brown fox jumps over the lazy dog near the river bank";
        let result = lay(&field(Alignment::Center, 150), text);
        let handle = FontResolver::builtin_only().resolve("Arial", false, false);
        let font = handle.scaled(24.0).unwrap();

        assert!(result.lines.len() > 1);
        for (i, line) in result.lines.iter().enumerate() {
            assert!(font.measure(&line.text) <= 150.0, "line '{}' too wide", line.text);
            assert!((line.x + line.width / 2.0 - 525.0).abs() < 1e-3);
            assert!((line.y - (100.0 + i as f32 * 24.0 * LINE_HEIGHT_FACTOR)).abs() < 1e-3);
        }
        let joined: Vec<&str> = result.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(joined.join(" "), text);
        assert!((result.bbox.height - result.lines.len() as f32 * 28.8).abs() < 1e-3);
    }

    #[test]
    fn overlong_word_stays_whole_on_its_own_line() {
        let result = lay(&field(Alignment::Left, 60), "Supercalifragilistic is long");
        assert_eq!(result.lines[0].text, "Supercalifragilistic");
        assert!(result.lines[0].width > 60.0);
        assert!(result.lines.iter().skip(1).all(|l| l.width <= 60.0));
    }

    #[test]
    fn wrapping_collapses_whitespace() {
        let result = lay(&field(Alignment::Left, 1000), "  Ada\t\tLovelace \n");
        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.lines[0].text, "Ada Lovelace");
    }

    #[test]
    fn line_breaks_stack_lines_without_wrapping() {
        let result = lay(&field(Alignment::Center, 0), "Ada Lovelace\r\nAnalytical\tEngine");
        let texts: Vec<&str> = result.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Ada Lovelace", "Analytical Engine"]);
        assert_eq!(result.lines[0].y, 100.0);
        assert!((result.lines[1].y - (100.0 + 24.0 * LINE_HEIGHT_FACTOR)).abs() < 1e-3);
        for line in &result.lines {
            assert!((line.x + line.width / 2.0 - 525.0).abs() < 1e-3);
        }

        let handle = FontResolver::builtin_only().resolve("", false, false);
        let font = handle.scaled(24.0).unwrap();
        assert!(result.lines.iter().all(|l| !l.text.chars().any(char::is_control)));
        assert!((result.lines[0].width - font.measure("Ada Lovelace")).abs() < 1e-3);
    }

    #[test]
    fn line_breaks_are_kept_when_wrapping() {
        let result = lay(&field(Alignment::Left, 1000), "Ada\n\nLovelace");
        let texts: Vec<&str> = result.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Ada", "", "Lovelace"]);
        assert!((result.bbox.height - 3.0 * 24.0 * LINE_HEIGHT_FACTOR).abs() < 1e-3);
    }

    #[test]
    fn empty_text_keeps_a_one_line_box() {
        let result = lay(&field(Alignment::Center, 0), "");
        assert!(result.lines.is_empty());
        assert_eq!(
            result.bbox,
            BoundingBox {
                x: 525.0,
                y: 100.0,
                width: 0.0,
                height: 24.0 * LINE_HEIGHT_FACTOR,
            }
        );
    }

    #[test]
    fn bbox_spans_every_line() {
        let result = lay(&field(Alignment::Right, 120), "one two three four five six");
        let widest = result.lines.iter().map(|l| l.width).fold(0.0, f32::max);
        assert!((result.bbox.width - widest).abs() < 1e-3);
        assert!((result.bbox.x + result.bbox.width - 525.0).abs() < 1e-3);
    }
}
