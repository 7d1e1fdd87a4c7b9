//! Output precision

use crate::image_pipeline::correction::types::Samples;

/// Stores `samples` at 8 bits (`s / 256`) when `to_8bit` is set, otherwise
/// at 16 bits unchanged.
pub fn convert(samples: Vec<u16>, to_8bit: bool) -> Samples {
    if to_8bit {
        Samples::U8(samples.into_iter().map(|s| (s >> 8) as u8).collect())
    } else {
        Samples::U16(samples)
    }
}
