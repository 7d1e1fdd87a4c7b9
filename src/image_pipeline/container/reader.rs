use tracing::{debug, warn};

use crate::image_pipeline::common::error::{MacsError, Result};
use crate::image_pipeline::container::compression::decompress;
use crate::image_pipeline::container::format::{
    ContainerHeader, MAGIC_GEO, MAGIC_META, MAGIC_PIXEL_DATA, MAGIC_PREVIEW, PayloadCompression,
};
use crate::image_pipeline::container::stream::StreamReader;
use crate::image_pipeline::container::{pose, records, types::ContainerContents};
use crate::image_pipeline::meta::{GeoPose, MetaData};
use crate::image_pipeline::raw::RawImage;

/// Seeks to `offset` and returns the body of the block tagged `magic`.
fn read_block<'a>(
    reader: &mut StreamReader<'a>,
    offset: usize,
    magic: i32,
    what: &str,
) -> Result<&'a [u8]> {
    reader.seek(offset)?;
    if reader.read_i32()? != magic {
        return Err(MacsError::FormatError(format!("missing {what} block magic")));
    }
    let size = reader.read_u32()? as usize;
    reader.read_raw(size)
}

/// Parses a complete container held in memory.
///
/// # Errors
///
/// * `FormatError` for a bad magic, truncated block or corrupt payload
/// * `UnsupportedVersion` for a version other than 1 or 2
/// * `SizeMismatch` if the payload disagrees with the declared image size
/// * any layout error from [`RawImage::new`]
pub fn read_container(data: &[u8]) -> Result<ContainerContents> {
    debug!("Decoding MACS container, {} bytes", data.len());
    let mut reader = StreamReader::new(data);
    let header = ContainerHeader::read(&mut reader)?;
    debug!(
        version = ?header.version,
        width = header.width,
        height = header.height,
        format = %header.format,
        "Read container header"
    );

    let meta = match header.offset_meta {
        0 => MetaData::default(),
        offset => records::decode(read_block(&mut reader, offset, MAGIC_META, "metadata")?)?,
    };

    let pose = match header.offset_geo {
        0 => GeoPose::default(),
        offset => match read_block(&mut reader, offset, MAGIC_GEO, "geo reference")? {
            [] => GeoPose::default(),
            block => pose::decode(block)?,
        },
    };

    // a damaged preview does not make the image unusable
    let preview = match header.offset_preview {
        0 => None,
        offset => match read_block(&mut reader, offset, MAGIC_PREVIEW, "preview") {
            Ok([]) => None,
            Ok(block) => Some(block.to_vec()),
            Err(e) => {
                warn!("Ignoring unreadable preview: {}", e);
                None
            }
        },
    };

    if header.offset_data == 0 {
        return Err(MacsError::FormatError("container has no pixel data".to_string()));
    }
    let payload = read_block(&mut reader, header.offset_data, MAGIC_PIXEL_DATA, "pixel data")?;
    let pixels = match header.compression {
        PayloadCompression::None => payload.to_vec(),
        PayloadCompression::Zlib => decompress(payload, header.image_size)?,
    };
    if pixels.len() != header.image_size {
        return Err(MacsError::SizeMismatch {
            what: "pixel data",
            expected: header.image_size,
            actual: pixels.len(),
        });
    }

    let bits_per_pixel = header.format.bits_per_pixel();
    if bits_per_pixel == 0 {
        return Err(MacsError::UnsupportedFormat(format!(
            "unknown pixel format in container header ({})",
            header.format
        )));
    }
    let pitch_bits = header
        .pixel_pitch
        .checked_mul(bits_per_pixel)
        .filter(|bits| bits % 8 == 0)
        .ok_or_else(|| {
            MacsError::FormatError(format!("invalid pixel pitch {}", header.pixel_pitch))
        })?;

    let raw = RawImage::new(
        pixels,
        header.width,
        header.height,
        pitch_bits / 8,
        header.format,
        header.endianness,
    )?;

    Ok(ContainerContents {
        raw,
        meta,
        pose,
        preview,
    })
}
