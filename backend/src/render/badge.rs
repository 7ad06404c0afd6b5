use crate::error::{BadgeError, BadgeResult};
use crate::fonts::{FontHandle, FontResolver, ScaledFont};
use crate::render::color::parse_color;
use crate::render::layout::{layout_with, LayoutLine};
use badge_common::model::badge::BadgeConfig;
use badge_common::model::csv::Row;
use badge_common::model::field::FieldPlacement;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage, RgbaImage};
use tiny_skia::{Color, FillRule, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};
use ttf_parser::OutlineBuilder;

/// Horizontal shear applied to faces without a real italic.
const SYNTHETIC_ITALIC_SKEW: f32 = 0.2;
/// Outline stroke for faces without a real bold, relative to the font size.
const SYNTHETIC_BOLD_STROKE: f32 = 0.04;

/// Renders one badge from scratch.
pub fn render(
    config: &BadgeConfig,
    fields: &[FieldPlacement],
    row: &Row,
    background: Option<&[u8]>,
    fonts: &FontResolver,
) -> BadgeResult<RgbImage> {
    BadgeCanvas::prepare(config, background)?.render(fields, row, fonts)
}

/// The badge base (background resized to badge size, or white), prepared
/// once and reused for every row of an export.
#[derive(Clone)]
pub struct BadgeCanvas {
    base: Pixmap,
}

impl BadgeCanvas {
    pub fn prepare(config: &BadgeConfig, background: Option<&[u8]>) -> BadgeResult<Self> {
        let (w, h) = (config.badge_width, config.badge_height);
        if w == 0 || h == 0 {
            return Err(BadgeError::InvalidInput(format!(
                "badge size must be positive, got {}x{}",
                w, h
            )));
        }
        let mut base = Pixmap::new(w, h).ok_or_else(|| {
            BadgeError::InvalidInput(format!("badge size {}x{} is not renderable", w, h))
        })?;

        match background {
            Some(bytes) => {
                let flattened = flatten_background(bytes, w, h)?;
                // Opaque pixels are identical premultiplied or not.
                base.data_mut().copy_from_slice(flattened.as_raw());
            }
            None => base.fill(Color::WHITE),
        }
        Ok(Self { base })
    }

    pub fn width(&self) -> u32 {
        self.base.width()
    }

    pub fn height(&self) -> u32 {
        self.base.height()
    }

    /// Paints `fields` in list order over a copy of the base.
    pub fn render(
        &self,
        fields: &[FieldPlacement],
        row: &Row,
        fonts: &FontResolver,
    ) -> BadgeResult<RgbImage> {
        let mut pixmap = self.base.clone();

        for field in fields {
            let text = row.get(&field.csv_column).unwrap_or(field.csv_column.as_str());
            let [r, g, b, a] = parse_color(&field.font_color)?;
            let handle = fonts.resolve(&field.font_family, field.bold, field.italic);
            let font = handle.scaled(field.font_size as f32)?;
            let layout = layout_with(field, text, &font);

            let mut paint = Paint::default();
            paint.set_color_rgba8(r, g, b, a);
            paint.anti_alias = true;

            for line in &layout.lines {
                draw_line(&mut pixmap, &font, &handle, line, &paint);
            }
        }

        Ok(to_rgb(&pixmap))
    }
}

fn flatten_background(bytes: &[u8], w: u32, h: u32) -> BadgeResult<RgbaImage> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| BadgeError::RenderingFailure(format!("background image: {}", e)))?;
    let resized: DynamicImage = if img.width() == w && img.height() == h {
        img
    } else {
        img.resize_exact(w, h, FilterType::Lanczos3)
    };

    let rgba = resized.to_rgba8();
    let mut flattened = RgbaImage::from_pixel(w, h, image::Rgba([255, 255, 255, 255]));
    image::imageops::overlay(&mut flattened, &rgba, 0, 0);
    Ok(flattened)
}

fn draw_line(
    pixmap: &mut Pixmap,
    font: &ScaledFont<'_>,
    handle: &FontHandle,
    line: &LayoutLine,
    paint: &Paint<'_>,
) {
    let baseline = line.y + font.ascender();
    let skew = if handle.synthetic_italic {
        SYNTHETIC_ITALIC_SKEW
    } else {
        0.0
    };
    let stroke = handle.synthetic_bold.then(|| Stroke {
        width: font.size() * SYNTHETIC_BOLD_STROKE,
        ..Stroke::default()
    });

    let mut pen_x = line.x;
    for ch in line.text.chars() {
        let mut builder = GlyphPathBuilder::new(pen_x, baseline, font.scale(), skew);
        if font.face().outline_glyph(font.glyph(ch), &mut builder).is_some() {
            if let Some(path) = builder.finish() {
                pixmap.fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
                if let Some(stroke) = &stroke {
                    pixmap.stroke_path(&path, paint, stroke, Transform::identity(), None);
                }
            }
        }
        pen_x += font.advance(ch);
    }
}

fn to_rgb(pixmap: &Pixmap) -> RgbImage {
    let raw: Vec<u8> = pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    RgbImage::from_raw(pixmap.width(), pixmap.height(), raw)
        .unwrap_or_else(|| RgbImage::new(pixmap.width(), pixmap.height()))
}

/// Feeds glyph outlines (font units, y up) into a tiny-skia path in badge
/// pixels (y down), optionally sheared.
struct GlyphPathBuilder {
    builder: PathBuilder,
    origin_x: f32,
    origin_y: f32,
    scale: f32,
    skew: f32,
}

impl GlyphPathBuilder {
    fn new(origin_x: f32, origin_y: f32, scale: f32, skew: f32) -> Self {
        Self {
            builder: PathBuilder::new(),
            origin_x,
            origin_y,
            scale,
            skew,
        }
    }

    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.origin_x + (x + y * self.skew) * self.scale,
            self.origin_y - y * self.scale,
        )
    }

    fn finish(self) -> Option<Path> {
        self.builder.finish()
    }
}

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
