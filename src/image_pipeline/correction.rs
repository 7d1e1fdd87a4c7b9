//! Image correction module
//!
//! Converts raw sensor samples into a radiometrically and geometrically
//! corrected image: devignetting, lens distortion, debayering, color
//! balance with stretch/gamma and an optional reduction to 8 bits.

mod bit_depth;
mod color;
mod devignette;
mod undistort;
pub mod options;
pub mod pipeline;
pub mod types;

#[cfg(test)]
mod tests;

pub use options::{
    ColorBalance, CorrectionOptions, CorrectionOptionsBuilder, Devignetting, Distortion, Stretch,
};
pub use pipeline::{CorrectionPipeline, CpuCorrectionPipeline};
pub use types::{CorrectedImage, Samples};
