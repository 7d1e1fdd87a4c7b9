use thiserror::Error;

#[derive(Error, Debug)]
pub enum MacsError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Malformed MACS container: {0}")]
    FormatError(String),

    #[error("Unsupported MACS container version: {0}")]
    UnsupportedVersion(i32),

    #[error("Size mismatch in {what}: expected {expected} bytes, found {actual}")]
    SizeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Invalid row pitch {pitch} for a row of {row_bytes} bytes")]
    InvalidPitch { pitch: usize, row_bytes: usize },

    #[error("Unsupported pixel format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid correction options: {0}")]
    InvalidOptions(String),

    #[error("Failed to demosaic image: {0}")]
    DebayerError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MacsError>;
