//! In-memory raw sensor image

use crate::image_pipeline::common::error::{MacsError, Result};
use crate::image_pipeline::raw::types::{PixelEndianness, PixelFormat};
use crate::image_pipeline::raw::unpack::unpack_row;

/// Raw sensor bytes plus the layout needed to interpret them.
///
/// The buffer is stored exactly as captured (possibly packed, possibly big
/// endian) and never modified after construction. `pitch` is the number of
/// bytes per row including any padding, so `raw_data().len()` is always
/// `pitch * height` for a valid image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    raw_data: Vec<u8>,
    width: usize,
    height: usize,
    pitch: usize,
    format: PixelFormat,
    endianness: PixelEndianness,
}

impl Default for RawImage {
    fn default() -> Self {
        Self {
            raw_data: Vec::new(),
            width: 0,
            height: 0,
            pitch: 0,
            format: PixelFormat::Invalid,
            endianness: PixelEndianness::Undefined,
        }
    }
}

impl RawImage {
    /// Builds an image from a stored buffer, validating the layout.
    ///
    /// # Errors
    ///
    /// * `InvalidDimensions` for a zero width/height, or an odd width with a
    ///   12-bit packed format
    /// * `UnsupportedFormat` for `PixelFormat::Invalid` or multi-byte samples
    ///   with undefined endianness
    /// * `InvalidPitch` if a row does not fit in `pitch` or `pitch` is not a
    ///   whole number of pixels
    /// * `SizeMismatch` if `data.len() != pitch * height`
    pub fn new(
        data: Vec<u8>,
        width: usize,
        height: usize,
        pitch: usize,
        format: PixelFormat,
        endianness: PixelEndianness,
    ) -> Result<Self> {
        if format == PixelFormat::Invalid {
            return Err(MacsError::UnsupportedFormat(format.to_string()));
        }
        if format.bit_depth() > 8 && endianness == PixelEndianness::Undefined {
            return Err(MacsError::UnsupportedFormat(format!(
                "{format} requires a defined endianness"
            )));
        }
        if width == 0 || height == 0 {
            return Err(MacsError::InvalidDimensions(width, height));
        }

        let bits_per_pixel = format.bits_per_pixel();
        let row_bits = width
            .checked_mul(bits_per_pixel)
            .ok_or(MacsError::InvalidDimensions(width, height))?;
        if row_bits % 8 != 0 {
            return Err(MacsError::InvalidDimensions(width, height));
        }
        let row_bytes = row_bits / 8;
        if pitch < row_bytes || (pitch * 8) % bits_per_pixel != 0 {
            return Err(MacsError::InvalidPitch { pitch, row_bytes });
        }

        let expected = pitch
            .checked_mul(height)
            .ok_or(MacsError::InvalidDimensions(width, height))?;
        if data.len() != expected {
            return Err(MacsError::SizeMismatch {
                what: "raw image data",
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            raw_data: data,
            width,
            height,
            pitch,
            format,
            endianness,
        })
    }

    /// Builds a tightly packed little-endian 16-bit image from samples.
    ///
    /// `samples` are row-major and channel-interleaved.
    pub fn from_samples(
        samples: &[u16],
        width: usize,
        height: usize,
        format: PixelFormat,
    ) -> Result<Self> {
        if format.bit_depth() != 16 {
            return Err(MacsError::UnsupportedFormat(format!(
                "{format} cannot be built from 16-bit samples"
            )));
        }
        let expected = width * height * format.channel_count();
        if samples.len() != expected {
            return Err(MacsError::SizeMismatch {
                what: "sample buffer",
                expected: expected * 2,
                actual: samples.len() * 2,
            });
        }
        let data = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        let pitch = width * 2 * format.channel_count();
        Self::new(data, width, height, pitch, format, PixelEndianness::Little)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per stored row.
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// Stored row length in pixels, as recorded in the container header.
    pub fn pixel_pitch(&self) -> usize {
        match self.format.bits_per_pixel() {
            0 => 0,
            bits => self.pitch * 8 / bits,
        }
    }

    pub fn bit_depth(&self) -> u32 {
        self.format.bit_depth()
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn endianness(&self) -> PixelEndianness {
        self.endianness
    }

    pub fn channel_count(&self) -> usize {
        self.format.channel_count()
    }

    pub fn byte_size(&self) -> usize {
        self.raw_data.len()
    }

    pub fn is_valid(&self) -> bool {
        !self.raw_data.is_empty() && self.format != PixelFormat::Invalid
    }

    pub fn is_mono(&self) -> bool {
        self.format.is_mono()
    }

    pub fn is_color(&self) -> bool {
        self.format.is_color()
    }

    /// The bytes exactly as stored.
    pub fn raw_data(&self) -> &[u8] {
        &self.raw_data
    }

    /// Samples widened to the full 16-bit range, row padding removed.
    ///
    /// Row-major, channel-interleaved, `width * height * channels` values.
    pub fn samples(&self) -> Result<Vec<u16>> {
        if !self.is_valid() {
            return Err(MacsError::UnsupportedFormat(self.format.to_string()));
        }
        let row_len = self.width * self.channel_count();
        let row_bytes = row_len * self.format.bit_depth() as usize / 8;
        let mut out = vec![0u16; row_len * self.height];
        for (dst, src) in out
            .chunks_exact_mut(row_len)
            .zip(self.raw_data.chunks_exact(self.pitch))
        {
            unpack_row(&src[..row_bytes], self.format, self.endianness, dst)?;
        }
        Ok(out)
    }

    /// Normalized samples as little-endian bytes.
    pub fn data(&self) -> Result<Vec<u8>> {
        Ok(self
            .samples()?
            .into_iter()
            .flat_map(u16::to_le_bytes)
            .collect())
    }
}
