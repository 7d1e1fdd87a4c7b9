//! MACS image container module
//!
//! Binary serialization of a raw image together with its metadata, geo
//! reference and an optional preview thumbnail.

mod compression;
mod format;
mod pose;
mod reader;
mod records;
mod stream;
mod writer;
pub mod types;

#[cfg(test)]
mod tests;

pub use format::{FormatVersion, PayloadCompression};
pub use reader::read_container;
pub use records::{MAX_COMMENT_LEN, MAX_TEXT_LEN};
pub use types::{ContainerContents, SaveOptions};
pub use writer::write_container;
