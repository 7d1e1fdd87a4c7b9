//! zlib payload compression with a 4-byte big-endian length prefix.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::image_pipeline::common::error::{MacsError, Result};

const MAX_INFLATE_RATIO: usize = 1032;

pub(crate) fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let len = u32::try_from(data.len())
        .map_err(|_| MacsError::EncodeError(format!("{} byte payload too large", data.len())))?;
    let mut encoder = ZlibEncoder::new(len.to_be_bytes().to_vec(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Inflates `data`, which must decode to exactly `expected` bytes.
pub(crate) fn decompress(data: &[u8], expected: usize) -> Result<Vec<u8>> {
    let Some((prefix, stream)) = data.split_first_chunk::<4>() else {
        return Err(MacsError::FormatError(
            "compressed payload is missing its length prefix".to_string(),
        ));
    };
    let declared = u32::from_be_bytes(*prefix) as usize;
    if declared != expected {
        return Err(MacsError::SizeMismatch {
            what: "compressed payload length prefix",
            expected,
            actual: declared,
        });
    }

    // zlib cannot inflate by more than about 1032:1
    let capacity = expected.min(stream.len().saturating_mul(MAX_INFLATE_RATIO));
    let mut out = Vec::with_capacity(capacity);
    ZlibDecoder::new(stream)
        .take(expected as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| MacsError::FormatError(format!("corrupt compressed payload: {e}")))?;
    if out.len() != expected {
        return Err(MacsError::SizeMismatch {
            what: "decompressed payload",
            expected,
            actual: out.len(),
        });
    }
    Ok(out)
}
