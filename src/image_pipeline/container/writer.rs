use tracing::debug;

use crate::image_pipeline::common::error::{MacsError, Result};
use crate::image_pipeline::container::compression::compress;
use crate::image_pipeline::container::format::{
    BLOCK_PREFIX_SIZE, ContainerHeader, FormatVersion, HEADER_SIZE, MAGIC_GEO, MAGIC_META,
    MAGIC_PIXEL_DATA, MAGIC_PREVIEW, PayloadCompression, to_u32,
};
use crate::image_pipeline::container::stream::StreamWriter;
use crate::image_pipeline::container::{pose, records};
use crate::image_pipeline::meta::{GeoPose, MetaData};
use crate::image_pipeline::raw::RawImage;

fn write_block(writer: &mut StreamWriter, magic: i32, body: &[u8]) -> Result<()> {
    writer.write_i32(magic);
    writer.write_u32(to_u32(body.len(), "block size")?);
    writer.write_raw(body);
    Ok(())
}

/// Serializes an image into a version 2 container.
///
/// The pose block is left empty when `pose` holds no data, the preview
/// block when `preview` is `None`.
///
/// # Errors
///
/// `UnsupportedFormat` if `raw` holds no pixel data or an invalid format.
pub fn write_container(
    raw: &RawImage,
    meta: &MetaData,
    pose: &GeoPose,
    preview: Option<&[u8]>,
    compression: PayloadCompression,
) -> Result<Vec<u8>> {
    if !raw.is_valid() {
        return Err(MacsError::UnsupportedFormat(format!(
            "cannot write {} image without pixel data",
            raw.format()
        )));
    }
    let meta_block = records::encode(meta)?;
    let geo_block = if pose.is_empty() {
        Vec::new()
    } else {
        pose::encode(pose)
    };
    let preview_block = preview.unwrap_or_default();
    let payload = match compression {
        PayloadCompression::None => raw.raw_data().to_vec(),
        PayloadCompression::Zlib => compress(raw.raw_data())?,
    };

    let offset_meta = HEADER_SIZE;
    let offset_geo = offset_meta + BLOCK_PREFIX_SIZE + meta_block.len();
    let offset_preview = offset_geo + BLOCK_PREFIX_SIZE + geo_block.len();
    let offset_data = offset_preview + BLOCK_PREFIX_SIZE + preview_block.len();

    let header = ContainerHeader {
        version: FormatVersion::V2,
        offset_meta,
        offset_geo: if geo_block.is_empty() { 0 } else { offset_geo },
        offset_preview: if preview_block.is_empty() { 0 } else { offset_preview },
        offset_data,
        image_size: raw.byte_size(),
        width: raw.width(),
        height: raw.height(),
        pixel_pitch: raw.pixel_pitch(),
        format: raw.format(),
        compression,
        endianness: raw.endianness(),
    };

    let mut writer = StreamWriter::new();
    header.write(&mut writer)?;
    write_block(&mut writer, MAGIC_META, &meta_block)?;
    write_block(&mut writer, MAGIC_GEO, &geo_block)?;
    write_block(&mut writer, MAGIC_PREVIEW, preview_block)?;
    write_block(&mut writer, MAGIC_PIXEL_DATA, &payload)?;

    let data = writer.into_inner();
    debug!(
        bytes = data.len(),
        payload = payload.len(),
        compressed = compression == PayloadCompression::Zlib,
        "Encoded MACS container"
    );
    Ok(data)
}
