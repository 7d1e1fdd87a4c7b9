//! Pipeline conversions module
//!
//! This module contains orchestration logic for turning stored containers
//! into other image formats.

mod macs_to_tiff;


pub use macs_to_tiff::MacsToTiffPipeline;
