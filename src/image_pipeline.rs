//! Image processing pipeline module
//!
//! This module provides the MACS raw image model, the container codec that
//! stores it on disk, the correction chain that turns it into a viewable
//! image and the TIFF export of the result.

pub mod common;
pub mod container;
pub mod conversions;
pub mod correction;
pub mod debayer;
pub mod export;
pub mod macs_image;
pub mod meta;
pub mod preview;
pub mod raw;

pub use common::{MacsError, PipelineTimings, Result};

pub use raw::{BayerPattern, ColorLayout, PixelEndianness, PixelFormat, RawImage};

pub use meta::{GeoPose, MetaData};

pub use container::{FormatVersion, SaveOptions};

pub use correction::{
    ColorBalance, CorrectedImage, CorrectionOptions, CorrectionOptionsBuilder, CorrectionPipeline,
    CpuCorrectionPipeline, Devignetting, Distortion, Samples, Stretch,
};

pub use export::{
    ExportConfig, ExportConfigBuilder, ImageExporter, StandardTiffWriter, TiffCompression,
};

pub use conversions::MacsToTiffPipeline;

pub use macs_image::MacsImage;
