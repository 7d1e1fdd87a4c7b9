//! Conversion of stored sample rows into normalized 16-bit samples.
//!
//! Every supported layout is widened to `u16` occupying the full 16-bit
//! range: 8-bit samples are shifted left by 8, 12-bit packed samples by 4.

use crate::image_pipeline::common::error::{MacsError, Result};
use crate::image_pipeline::raw::types::{PixelEndianness, PixelFormat};

/// Unpacks one stored row of `samples` values into `out`.
pub(crate) fn unpack_row(
    row: &[u8],
    format: PixelFormat,
    endianness: PixelEndianness,
    out: &mut [u16],
) -> Result<()> {
    match format.bit_depth() {
        8 => {
            for (dst, &src) in out.iter_mut().zip(row) {
                *dst = u16::from(src) << 8;
            }
            Ok(())
        }
        12 => unpack_12bit_row(row, endianness, out),
        16 => {
            let from_bytes: fn([u8; 2]) -> u16 = match endianness {
                PixelEndianness::Little => u16::from_le_bytes,
                PixelEndianness::Big => u16::from_be_bytes,
                PixelEndianness::Undefined => {
                    return Err(MacsError::UnsupportedFormat(format!(
                        "{format} with undefined endianness"
                    )));
                }
            };
            for (dst, pair) in out.iter_mut().zip(row.chunks_exact(2)) {
                *dst = from_bytes([pair[0], pair[1]]);
            }
            Ok(())
        }
        _ => Err(MacsError::UnsupportedFormat(format.to_string())),
    }
}

/// Two 12-bit samples share three bytes. The middle byte carries the low
/// nibble of the first sample (little endian) or its least significant
/// bits (big endian) and the low nibble of the second sample.
fn unpack_12bit_row(row: &[u8], endianness: PixelEndianness, out: &mut [u16]) -> Result<()> {
    for (dst, src) in out.chunks_exact_mut(2).zip(row.chunks_exact(3)) {
        let (b0, b1, b2) = (u16::from(src[0]), u16::from(src[1]), u16::from(src[2]));
        dst[0] = match endianness {
            PixelEndianness::Little => (b0 | (b1 & 0x0F) << 8) << 4,
            PixelEndianness::Big => (b0 << 4 | (b1 & 0x0F)) << 4,
            PixelEndianness::Undefined => {
                return Err(MacsError::UnsupportedFormat(
                    "12-bit packed data with undefined endianness".to_string(),
                ));
            }
        };
        dst[1] = (b2 << 8) | (b1 & 0xF0);
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn pack_12bit_le(samples: &[u16]) -> Vec<u8> {
    samples
        .chunks_exact(2)
        .flat_map(|pair| {
            let (a, b) = (pair[0] & 0x0FFF, pair[1] & 0x0FFF);
            [(a & 0xFF) as u8, ((a >> 8) | ((b & 0x0F) << 4)) as u8, (b >> 4) as u8]
        })
        .collect()
}
