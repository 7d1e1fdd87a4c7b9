//! Raw sensor image module
//!
//! This module holds the stored pixel buffer and the layout descriptors
//! (pixel format, endianness) needed to interpret it.

mod raw_image;
pub(crate) mod unpack;
pub mod types;

pub use raw_image::RawImage;
pub use types::{BayerPattern, ColorLayout, PixelEndianness, PixelFormat};
