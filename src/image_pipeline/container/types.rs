//! Container level types

use crate::image_pipeline::meta::{GeoPose, MetaData};
use crate::image_pipeline::raw::RawImage;

/// Everything a container file holds.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerContents {
    pub raw: RawImage,
    pub meta: MetaData,
    pub pose: GeoPose,
    /// Embedded JPEG thumbnail, if one was stored.
    pub preview: Option<Vec<u8>>,
}

/// Variants of the stored container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Embed a small JPEG rendering of the default-corrected image.
    pub preview: bool,
    /// zlib-compress the pixel payload.
    pub compression: bool,
}

impl SaveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preview(mut self, enable: bool) -> Self {
        self.preview = enable;
        self
    }

    pub fn compression(mut self, enable: bool) -> Self {
        self.compression = enable;
        self
    }
}
