//! Image export module
//!
//! Writes corrected images as TIFF files with various compression options.

mod standard_tiff_writer;
mod writer;
pub mod types;

pub use standard_tiff_writer::StandardTiffWriter;
pub use types::{ExportConfig, ExportConfigBuilder, TiffCompression};
pub use writer::ImageExporter;
