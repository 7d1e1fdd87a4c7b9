//! Container header: magic numbers, table of contents and image attributes.

use crate::image_pipeline::common::error::{MacsError, Result};
use crate::image_pipeline::container::stream::{StreamReader, StreamWriter};
use crate::image_pipeline::raw::{PixelEndianness, PixelFormat};

const fn fourcc(tag: &[u8; 4]) -> i32 {
    i32::from_be_bytes(*tag)
}

pub(crate) const MAGIC_CONTAINER: i32 = fourcc(b"MIC#");
pub(crate) const MAGIC_META: i32 = fourcc(b"MMD#");
pub(crate) const MAGIC_GEO: i32 = fourcc(b"GEO#");
pub(crate) const MAGIC_PREVIEW: i32 = fourcc(b"MPV#");
pub(crate) const MAGIC_PIXEL_DATA: i32 = fourcc(b"MID#");

const TOC_META: i32 = 0x0100_0000;
const TOC_GEO: i32 = 0x0200_0000;
const TOC_PREVIEW: i32 = 0x0300_0000;
const TOC_PIXEL_DATA: i32 = 0x0400_0000;

/// Size of a version 2 header; the metadata block starts right after it.
pub(crate) const HEADER_SIZE: usize = 17 * 4;

/// Size of the magic + length prefix in front of every block.
pub(crate) const BLOCK_PREFIX_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum FormatVersion {
    /// No endianness field; endianness is implied by the pixel format.
    V1 = 1,
    V2 = 2,
}

impl FormatVersion {
    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            1 => Some(FormatVersion::V1),
            2 => Some(FormatVersion::V2),
            _ => None,
        }
    }
}

/// Pixel payload encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadCompression {
    #[default]
    None,
    /// `u32` big-endian uncompressed length followed by a zlib stream.
    Zlib,
}

impl PayloadCompression {
    fn from_code(code: u32) -> Result<Self> {
        match code {
            0 => Ok(PayloadCompression::None),
            1 => Ok(PayloadCompression::Zlib),
            other => Err(MacsError::FormatError(format!(
                "unknown payload compression {other}"
            ))),
        }
    }

    fn code(self) -> u32 {
        match self {
            PayloadCompression::None => 0,
            PayloadCompression::Zlib => 1,
        }
    }
}

/// Parsed fixed-size header. Block offsets of 0 mean the block is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ContainerHeader {
    pub version: FormatVersion,
    pub offset_meta: usize,
    pub offset_geo: usize,
    pub offset_preview: usize,
    pub offset_data: usize,
    /// Uncompressed payload size in bytes.
    pub image_size: usize,
    pub width: usize,
    pub height: usize,
    /// Row length in pixels.
    pub pixel_pitch: usize,
    pub format: PixelFormat,
    pub compression: PayloadCompression,
    pub endianness: PixelEndianness,
}

impl ContainerHeader {
    pub fn read(reader: &mut StreamReader<'_>) -> Result<Self> {
        if reader.read_i32()? != MAGIC_CONTAINER {
            return Err(MacsError::FormatError(
                "missing MACS image container magic".to_string(),
            ));
        }
        let raw_version = reader.read_i32()?;
        let version =
            FormatVersion::from_i32(raw_version).ok_or(MacsError::UnsupportedVersion(raw_version))?;

        let offset_meta = read_toc_entry(reader, TOC_META, "metadata")?;
        let offset_geo = read_toc_entry(reader, TOC_GEO, "geo reference")?;
        let offset_preview = read_toc_entry(reader, TOC_PREVIEW, "preview")?;
        let offset_data = read_toc_entry(reader, TOC_PIXEL_DATA, "pixel data")?;

        let image_size = reader.read_u32()? as usize;
        let width = reader.read_u32()? as usize;
        let height = reader.read_u32()? as usize;
        let pixel_pitch = reader.read_u32()? as usize;
        let format = PixelFormat::from_code(reader.read_u32()?);
        let compression = PayloadCompression::from_code(reader.read_u32()?)?;

        let endianness = match version {
            // only the packed SVS cameras wrote big endian data
            FormatVersion::V1 => match format {
                PixelFormat::BayerGR12Packed | PixelFormat::Mono12Packed => PixelEndianness::Big,
                _ => PixelEndianness::Little,
            },
            FormatVersion::V2 => {
                let code = reader.read_u32()?;
                PixelEndianness::from_code(code).ok_or_else(|| {
                    MacsError::FormatError(format!("unknown pixel endianness {code}"))
                })?
            }
        };

        Ok(Self {
            version,
            offset_meta,
            offset_geo,
            offset_preview,
            offset_data,
            image_size,
            width,
            height,
            pixel_pitch,
            format,
            compression,
            endianness,
        })
    }

    /// Writes a version 2 header. Offsets must fit in an `i32`.
    pub fn write(&self, writer: &mut StreamWriter) -> Result<()> {
        writer.write_i32(MAGIC_CONTAINER);
        writer.write_i32(FormatVersion::V2 as i32);

        for (tag, offset) in [
            (TOC_META, self.offset_meta),
            (TOC_GEO, self.offset_geo),
            (TOC_PREVIEW, self.offset_preview),
            (TOC_PIXEL_DATA, self.offset_data),
        ] {
            writer.write_i32(tag);
            writer.write_i32(to_i32(offset, "block offset")?);
        }

        for (value, what) in [
            (self.image_size, "image size"),
            (self.width, "image width"),
            (self.height, "image height"),
            (self.pixel_pitch, "image pitch"),
        ] {
            writer.write_u32(to_u32(value, what)?);
        }
        writer.write_u32(self.format.code());
        writer.write_u32(self.compression.code());
        writer.write_u32(self.endianness.code());
        Ok(())
    }
}

fn read_toc_entry(reader: &mut StreamReader<'_>, tag: i32, what: &str) -> Result<usize> {
    if reader.read_i32()? != tag {
        return Err(MacsError::FormatError(format!(
            "missing table of contents entry for {what}"
        )));
    }
    let offset = reader.read_i32()?;
    usize::try_from(offset)
        .map_err(|_| MacsError::FormatError(format!("negative {what} offset {offset}")))
}

fn to_i32(value: usize, what: &str) -> Result<i32> {
    i32::try_from(value).map_err(|_| MacsError::EncodeError(format!("{what} {value} too large")))
}

pub(crate) fn to_u32(value: usize, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| MacsError::EncodeError(format!("{what} {value} too large")))
}
