//! Badge rasterisation: layout, colors, backgrounds and compositing.

pub mod background;
pub mod badge;
pub mod color;
pub mod layout;

pub use background::Background;
pub use badge::{render, BadgeCanvas};

use crate::error::{BadgeError, BadgeResult};
use image::RgbImage;
use png::{BitDepth, ColorType, Encoder};

/// Encodes an RGB raster as an 8-bit PNG.
pub fn encode_png(image: &RgbImage) -> BadgeResult<Vec<u8>> {
    let (w, h) = image.dimensions();
    let mut out = Vec::new();
    {
        let mut encoder = Encoder::new(&mut out, w, h);
        encoder.set_color(ColorType::Rgb);
        encoder.set_depth(BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| BadgeError::RenderingFailure(format!("PNG encoding: {}", e)))?;
        writer
            .write_image_data(image.as_raw())
            .map_err(|e| BadgeError::RenderingFailure(format!("PNG encoding: {}", e)))?;
        writer
            .finish()
            .map_err(|e| BadgeError::RenderingFailure(format!("PNG encoding: {}", e)))?;
    }
    Ok(out)
}
