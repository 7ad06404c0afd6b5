use crate::error::{BadgeError, BadgeResult};
use crate::export::grid::GridLayout;
use image::RgbImage;
use printpdf::{
    ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Px,
};
use std::io::BufWriter;

const MM_PER_INCH: f64 = 25.4;

/// A PDF being filled badge by badge according to a [`GridLayout`].
pub struct PdfSheet {
    doc: PdfDocumentReference,
    layout: GridLayout,
    layers: Vec<PdfLayerReference>,
}

impl PdfSheet {
    pub fn new(layout: GridLayout, title: &str) -> Self {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(layout.page_width as f32),
            Mm(layout.page_height as f32),
            "Badges",
        );
        let first = doc.get_page(page).get_layer(layer);
        Self {
            doc,
            layout,
            layers: vec![first],
        }
    }

    pub fn page_count(&self) -> usize {
        self.layers.len()
    }

    fn layer(&mut self, page: usize) -> PdfLayerReference {
        while self.layers.len() <= page {
            let (page, layer) = self.doc.add_page(
                Mm(self.layout.page_width as f32),
                Mm(self.layout.page_height as f32),
                "Badges",
            );
            self.layers.push(self.doc.get_page(page).get_layer(layer));
        }
        self.layers[page].clone()
    }

    /// Embeds `badge` in grid slot `index`, adding pages as needed.
    pub fn place(&mut self, index: usize, badge: &RgbImage) -> BadgeResult<()> {
        let slot = self.layout.slot(index);
        let layer = self.layer(slot.page);
        let (width, height) = badge.dimensions();
        if width == 0 || height == 0 {
            return Err(BadgeError::ExportFailure("empty badge image".to_string()));
        }

        let image = Image::from(ImageXObject {
            width: Px(width as usize),
            height: Px(height as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: badge.as_raw().clone(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        });

        // DPI = pixels / (mm / 25.4); the aspect ratio is preserved, so one
        // value fits both axes.
        let dpi = f64::from(width) / (self.layout.badge_width / MM_PER_INCH);

        image.add_to_layer(
            layer,
            ImageTransform {
                translate_x: Some(Mm(slot.x as f32)),
                translate_y: Some(Mm(slot.y as f32)),
                dpi: Some(dpi as f32),
                ..Default::default()
            },
        );
        Ok(())
    }

    pub fn finish(self) -> BadgeResult<Vec<u8>> {
        let mut writer = BufWriter::new(Vec::new());
        self.doc
            .save(&mut writer)
            .map_err(|e| BadgeError::ExportFailure(format!("PDF write: {}", e)))?;
        writer
            .into_inner()
            .map_err(|e| BadgeError::ExportFailure(format!("PDF write: {}", e)))
    }
}
