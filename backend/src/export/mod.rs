//! Batch export: every row rendered in order and tiled into one PDF.

pub mod grid;
pub mod pdf;

use crate::error::{BadgeError, BadgeResult};
use crate::fonts::FontResolver;
use crate::render::{Background, BadgeCanvas};
use badge_common::model::badge::BadgeConfig;
use badge_common::model::csv::Row;
use badge_common::model::field::FieldPlacement;
use grid::GridLayout;
use image::RgbImage;
use pdf::PdfSheet;
use std::sync::Arc;

const DOCUMENT_TITLE: &str = "Badges";

/// Everything an export reads, copied out of the session when it starts so
/// later edits cannot reach it.
#[derive(Debug, Clone)]
pub struct ExportSnapshot {
    pub config: BadgeConfig,
    pub fields: Vec<FieldPlacement>,
    pub rows: Vec<Row>,
    pub background: Option<Arc<Background>>,
}

impl ExportSnapshot {
    pub fn total(&self) -> usize {
        self.rows.len()
    }

    fn background_bytes(&self) -> Option<&[u8]> {
        self.background.as_deref().map(Background::bytes)
    }
}

/// Renders rows `0..total` in order, calling `on_progress` with the number
/// of finished rows after each one. The first failure aborts the export.
pub fn export_pdf(
    snapshot: &ExportSnapshot,
    fonts: &FontResolver,
    mut on_progress: impl FnMut(usize),
) -> BadgeResult<Vec<u8>> {
    let layout = GridLayout::new(&snapshot.config)
        .map_err(|e| BadgeError::ExportFailure(e.to_string()))?;
    let canvas = BadgeCanvas::prepare(&snapshot.config, snapshot.background_bytes())
        .map_err(|e| BadgeError::ExportFailure(e.to_string()))?;

    let mut sheet = PdfSheet::new(layout, DOCUMENT_TITLE);
    for (index, row) in snapshot.rows.iter().enumerate() {
        let badge = canvas
            .render(&snapshot.fields, row, fonts)
            .map_err(|e| BadgeError::ExportFailure(format!("row {}: {}", index + 1, e)))?;
        sheet.place(index, &badge)?;
        on_progress(index + 1);
    }
    sheet.finish()
}

/// A one-badge PDF using the configured page and grid.
pub fn single_badge_pdf(config: &BadgeConfig, badge: &RgbImage) -> BadgeResult<Vec<u8>> {
    let layout = GridLayout::new(config)?;
    let mut sheet = PdfSheet::new(layout, DOCUMENT_TITLE);
    sheet.place(0, badge)?;
    sheet.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::Content;
    use lopdf::Document;

    fn snapshot(rows: usize) -> ExportSnapshot {
        ExportSnapshot {
            config: BadgeConfig {
                badge_width: 105,
                badge_height: 60,
                ..BadgeConfig::default()
            },
            fields: vec![FieldPlacement::new("Name").at(52.0, 10.0).sized(14)],
            rows: (0..rows)
                .map(|i| [("Name".to_string(), format!("Guest {}", i + 1))].into_iter().collect())
                .collect(),
            background: None,
        }
    }

    fn images_per_page(pdf: &[u8]) -> Vec<usize> {
        let doc = Document::load_mem(pdf).unwrap();
        doc.get_pages()
            .values()
            .map(|page_id| {
                let content = Content::decode(&doc.get_page_content(*page_id).unwrap()).unwrap();
                content
                    .operations
                    .iter()
                    .filter(|op| op.operator == "Do")
                    .count()
            })
            .collect()
    }

    #[test]
    fn ten_rows_on_a_two_by_four_grid_make_two_pages() {
        let fonts = FontResolver::builtin_only();
        let mut seen = Vec::new();
        let pdf = export_pdf(&snapshot(10), &fonts, |done| seen.push(done)).unwrap();

        assert_eq!(seen, (1..=10).collect::<Vec<_>>());
        assert!(pdf.starts_with(b"%PDF"));
        assert_eq!(images_per_page(&pdf), vec![8, 2]);
    }

    #[test]
    fn zero_rows_give_one_blank_page() {
        let fonts = FontResolver::builtin_only();
        let pdf = export_pdf(&snapshot(0), &fonts, |_| {}).unwrap();
        assert_eq!(images_per_page(&pdf), vec![0]);
    }

    #[test]
    fn a_failing_row_aborts_with_its_row_number() {
        let fonts = FontResolver::builtin_only();
        let mut snap = snapshot(3);
        snap.fields[0].font_color = "not-a-color".to_string();
        let mut progress = 0;
        let err = export_pdf(&snap, &fonts, |done| progress = done).unwrap_err();
        match err {
            BadgeError::ExportFailure(msg) => assert!(msg.starts_with("row 1:"), "{msg}"),
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(progress, 0);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn tiny_cells_on_a_huge_grid_still_export() {
        let mut snapshot = snapshot(1);
        snapshot.config = BadgeConfig {
            badge_width: 10,
            badge_height: 10,
            badges_per_row: 65536,
            badges_per_col: 65536,
            margin_mm: 0.0,
            spacing_mm: 0.0,
            ..BadgeConfig::default()
        };
        let fonts = FontResolver::builtin_only();
        let pdf = export_pdf(&snapshot, &fonts, |_| {}).unwrap();
        assert_eq!(images_per_page(&pdf), vec![1]);
    }

    #[test]
    fn single_badge_pdf_has_one_image() {
        let config = BadgeConfig::default();
        let badge = RgbImage::from_pixel(105, 60, image::Rgb([200, 10, 10]));
        let pdf = single_badge_pdf(&config, &badge).unwrap();
        assert_eq!(images_per_page(&pdf), vec![1]);
    }
}
