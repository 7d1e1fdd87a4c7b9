use std::io::Cursor;

use bayer::{BayerDepth, Demosaic, RasterDepth, RasterMut};
use tracing::{debug, info};

use crate::image_pipeline::common::error::{MacsError, Result};
use crate::image_pipeline::debayer::ImageBuffer;
use crate::image_pipeline::raw::{BayerPattern, ColorLayout};

/// Bilinear demosaicing on the CPU through the `bayer` crate.
///
/// Mono and RGB buffers pass through untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpuDebayer;

impl CpuDebayer {
    pub fn new() -> Self {
        Self
    }

    pub fn process(&self, image: &ImageBuffer, layout: ColorLayout) -> Result<ImageBuffer> {
        match layout {
            ColorLayout::Mono | ColorLayout::Rgb => Ok(image.clone()),
            ColorLayout::Bayer(pattern) => self.demosaic(image, pattern),
        }
    }

    fn demosaic(&self, image: &ImageBuffer, pattern: BayerPattern) -> Result<ImageBuffer> {
        let width = image.width;
        let height = image.height;
        if image.channels != 1 {
            return Err(MacsError::DebayerError(format!(
                "expected a single channel mosaic, got {} channels",
                image.channels
            )));
        }
        if width < 2 || height < 2 {
            return Err(MacsError::DebayerError(format!(
                "mosaic of {width}x{height} is smaller than one Bayer cell"
            )));
        }
        info!("Starting CPU debayering for image {}x{}", width, height);

        let bayer_bytes: Vec<u8> = image.data.iter().flat_map(|v| v.to_le_bytes()).collect();
        let mut output_buf = vec![0u8; width * height * 3 * 2];
        let mut cursor = Cursor::new(&bayer_bytes[..]);

        debug!(
            "Running demosaic with CFA={:?}, algo=Linear, {} input bytes",
            pattern,
            bayer_bytes.len()
        );

        let mut output_raster = RasterMut::new(width, height, RasterDepth::Depth16, &mut output_buf);
        bayer::run_demosaic(
            &mut cursor,
            BayerDepth::Depth16LE,
            pattern.cfa(),
            Demosaic::Linear,
            &mut output_raster,
        )
        .map_err(|e| MacsError::DebayerError(format!("{:?}", e)))?;

        // the raster holds host-order u16 values
        let data = output_buf
            .chunks_exact(2)
            .map(|b| u16::from_ne_bytes([b[0], b[1]]))
            .collect();

        Ok(ImageBuffer::new(width, height, 3, data))
    }
}
