use crate::error::{BadgeError, BadgeResult};
use crate::render::encode_png;
use image::{ImageFormat, ImageReader};
use std::io::Cursor;

/// Larger uploads are refused before the full decode.
pub const MAX_BACKGROUND_PIXELS: u64 = 25_000_000;

/// An uploaded background, validated once and then shared read-only.
#[derive(Debug)]
pub struct Background {
    bytes: Vec<u8>,
    pub filename: String,
    pub width: u32,
    pub height: u32,
    /// Hex MD5 of the raw bytes; part of the preview cache key.
    pub digest: String,
    format: Option<ImageFormat>,
}

impl Background {
    pub fn decode(bytes: Vec<u8>, filename: impl Into<String>) -> BadgeResult<Self> {
        let reader = ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .map_err(|e| BadgeError::InvalidInput(format!("unreadable image: {}", e)))?;
        let format = reader.format();
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| BadgeError::InvalidInput(format!("unreadable image: {}", e)))?;

        if width == 0 || height == 0 {
            return Err(BadgeError::InvalidInput("image has no pixels".to_string()));
        }
        if u64::from(width) * u64::from(height) > MAX_BACKGROUND_PIXELS {
            return Err(BadgeError::InvalidInput(format!(
                "image is {}x{}, above the {} pixel limit",
                width, height, MAX_BACKGROUND_PIXELS
            )));
        }
        image::load_from_memory(&bytes)
            .map_err(|e| BadgeError::InvalidInput(format!("unreadable image: {}", e)))?;

        let mut hasher = md5::Context::new();
        hasher.consume(&bytes);
        let digest = format!("{:x}", hasher.finalize());

        Ok(Self {
            bytes,
            filename: filename.into(),
            width,
            height,
            digest,
            format,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The image as PNG; PNG uploads are returned as they came.
    pub fn to_png(&self) -> BadgeResult<Vec<u8>> {
        if self.format == Some(ImageFormat::Png) {
            return Ok(self.bytes.clone());
        }
        let img = image::load_from_memory(&self.bytes)
            .map_err(|e| BadgeError::RenderingFailure(e.to_string()))?;
        encode_png(&img.to_rgb8())
    }
}
