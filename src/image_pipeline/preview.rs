//! JPEG thumbnail embedded in saved containers

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, RgbImage};
use tracing::debug;

use crate::image_pipeline::common::error::{MacsError, Result};
use crate::image_pipeline::correction::CorrectedImage;

pub const PREVIEW_WIDTH: u32 = 256;
pub const PREVIEW_QUALITY: u8 = 50;

/// Scales `image` to [`PREVIEW_WIDTH`] pixels wide, keeping the aspect
/// ratio, and encodes it as JPEG.
pub fn render_preview(image: &CorrectedImage) -> Result<Vec<u8>> {
    let width = u32::try_from(image.width)
        .map_err(|_| MacsError::InvalidDimensions(image.width, image.height))?;
    let height = u32::try_from(image.height)
        .map_err(|_| MacsError::InvalidDimensions(image.width, image.height))?;
    if width == 0 || height == 0 {
        return Err(MacsError::InvalidDimensions(image.width, image.height));
    }
    let pixels = image.as_u8();

    let full = match image.channels {
        1 => GrayImage::from_raw(width, height, pixels).map(DynamicImage::ImageLuma8),
        3 => RgbImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgb8),
        _ => None,
    }
    .ok_or_else(|| {
        MacsError::EncodeError(format!(
            "cannot build a preview from a {}x{}x{} image",
            image.width, image.height, image.channels
        ))
    })?;

    let preview_height = ((u64::from(height) * u64::from(PREVIEW_WIDTH) + u64::from(width) / 2)
        / u64::from(width))
    .max(1) as u32;
    let scaled = full.resize_exact(PREVIEW_WIDTH, preview_height, FilterType::Triangle);

    let mut jpeg = Vec::new();
    scaled
        .write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, PREVIEW_QUALITY))
        .map_err(|e| MacsError::EncodeError(e.to_string()))?;
    debug!(
        "Rendered {}x{} preview, {} bytes",
        PREVIEW_WIDTH,
        preview_height,
        jpeg.len()
    );
    Ok(jpeg)
}
