//! Capture metadata module
//!
//! Camera identity records and the geo reference stored next to the pixels.

pub mod types;

pub use types::{GeoPose, MetaData};
