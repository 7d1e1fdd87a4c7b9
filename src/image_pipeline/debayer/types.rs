//! Types for debayering operations

/// Working buffer passed between the correction stages.
///
/// Samples are normalized to the full 16-bit range, row-major and
/// channel-interleaved (`[R, G, B, R, G, B, ...]` for color).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// 1 for mono and undebayered mosaics, 3 for RGB
    pub channels: usize,
    pub data: Vec<u16>,
}

impl ImageBuffer {
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<u16>) -> Self {
        debug_assert_eq!(data.len(), width * height * channels);
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    /// Sample of `channel` at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize, channel: usize) -> u16 {
        self.data[(y * self.width + x) * self.channels + channel]
    }
}
