//! Corrected output image

/// Output sample storage; 8-bit for 8-bit sources or when a reduction was
/// requested, 16-bit otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Samples {
    U8(Vec<u8>),
    U16(Vec<u16>),
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Samples::U8(v) => v.len(),
            Samples::U16(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bits_per_sample(&self) -> u32 {
        match self {
            Samples::U8(_) => 8,
            Samples::U16(_) => 16,
        }
    }
}

/// Result of the correction pipeline: one (mono) or three (RGB) interleaved
/// channels, row-major, no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectedImage {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub samples: Samples,
}

impl CorrectedImage {
    pub fn is_8bit(&self) -> bool {
        matches!(self.samples, Samples::U8(_))
    }

    pub fn is_color(&self) -> bool {
        self.channels == 3
    }

    /// Samples reduced to 8 bits (`s / 256` for 16-bit data).
    pub fn to_8bit(&self) -> Self {
        Self {
            samples: Samples::U8(self.as_u8()),
            ..*self
        }
    }

    /// Samples as 8-bit values, reducing 16-bit data on the fly.
    pub fn as_u8(&self) -> Vec<u8> {
        match &self.samples {
            Samples::U8(v) => v.clone(),
            Samples::U16(v) => v.iter().map(|&s| (s >> 8) as u8).collect(),
        }
    }
}
