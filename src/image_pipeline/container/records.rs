//! Tagged record stream for [`MetaData`].
//!
//! `[key][value] ... [EOR]` where the upper 16 bits of a key identify the
//! field and the lower 16 bits its value type.
//!
//! Text is stored as raw bytes. Non UTF-8 bytes are replaced with U+FFFD
//! on read, so such text does not round-trip byte for byte.

use std::borrow::Cow;

use tracing::warn;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::container::stream::{StreamReader, StreamWriter};
use crate::image_pipeline::meta::MetaData;

const END_OF_RECORDS: i32 = i32::from_be_bytes(*b"EOR#");

const INT32_T: i32 = 0x0004;
const STRING_T: i32 = 0x0100;

const fn key(id: i32, value_type: i32) -> i32 {
    (id << 16) + value_type
}

const CAM_VENDOR: i32 = key(0x01, STRING_T);
const CAM_MODEL: i32 = key(0x02, STRING_T);
const CAM_NAME: i32 = key(0x03, STRING_T);
const CAM_SERIAL: i32 = key(0x04, STRING_T);
const CAM_MAC: i32 = key(0x05, STRING_T);
const CAM_IP: i32 = key(0x06, STRING_T);
const CAM_FIRMWARE: i32 = key(0x07, STRING_T);
const IMG_ID: i32 = key(0x11, INT32_T);
const IMG_IDX: i32 = key(0x12, INT32_T);
const IMG_TAP: i32 = key(0x13, INT32_T);
const IMG_EXP: i32 = key(0x14, INT32_T);
const IMG_TIME: i32 = key(0x15, INT32_T);
const AFFIX: i32 = key(0x1F, STRING_T);
const COMMENT: i32 = key(0x21, STRING_T);

/// Longest stored text field, in bytes.
pub const MAX_TEXT_LEN: usize = 32;
/// Longest stored comment, in bytes.
pub const MAX_COMMENT_LEN: usize = 128;

/// Longest prefix of `s` that fits in `max` bytes without splitting a
/// character.
fn truncate_utf8(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

pub(crate) fn encode(meta: &MetaData) -> Result<Vec<u8>> {
    let mut writer = StreamWriter::new();

    let text_fields = [
        (CAM_VENDOR, &meta.cam_vendor),
        (CAM_MODEL, &meta.cam_model),
        (CAM_NAME, &meta.cam_name),
        (CAM_SERIAL, &meta.cam_serial),
        (CAM_MAC, &meta.cam_mac),
        (CAM_IP, &meta.cam_ip),
        (CAM_FIRMWARE, &meta.cam_firmware),
    ];
    for (key, value) in text_fields {
        if let Some(value) = value {
            writer.write_i32(key);
            writer.write_bytes(truncate_utf8(value, MAX_TEXT_LEN).as_bytes())?;
        }
    }

    let int_fields = [
        (IMG_ID, meta.image_id),
        (IMG_IDX, meta.image_idx),
        (IMG_TAP, meta.tap_count),
        (IMG_EXP, meta.exp_time_us),
        (IMG_TIME, meta.time_stamp),
    ];
    for (key, value) in int_fields {
        if let Some(value) = value {
            writer.write_i32(key);
            writer.write_i32(value);
        }
    }

    if let Some(comment) = &meta.comment {
        writer.write_i32(COMMENT);
        writer.write_bytes(truncate_utf8(comment, MAX_COMMENT_LEN).as_bytes())?;
    }
    if let Some(affix) = &meta.affix {
        writer.write_i32(AFFIX);
        writer.write_bytes(truncate_utf8(affix, MAX_TEXT_LEN).as_bytes())?;
    }

    writer.write_i32(END_OF_RECORDS);
    Ok(writer.into_inner())
}

fn read_text(reader: &mut StreamReader<'_>) -> Result<Option<String>> {
    Ok(reader.read_bytes()?.map(|bytes| match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(text) => text.to_string(),
        Cow::Owned(text) => {
            warn!("Replaced invalid UTF-8 in metadata text {:?}", text);
            text
        }
    }))
}

pub(crate) fn decode(data: &[u8]) -> Result<MetaData> {
    let mut meta = MetaData::default();
    let mut reader = StreamReader::new(data);

    while !reader.at_end() {
        let key = reader.read_i32()?;
        match key {
            END_OF_RECORDS => break,
            CAM_VENDOR => meta.cam_vendor = read_text(&mut reader)?,
            CAM_MODEL => meta.cam_model = read_text(&mut reader)?,
            CAM_NAME => meta.cam_name = read_text(&mut reader)?,
            CAM_SERIAL => meta.cam_serial = read_text(&mut reader)?,
            CAM_MAC => meta.cam_mac = read_text(&mut reader)?,
            CAM_IP => meta.cam_ip = read_text(&mut reader)?,
            CAM_FIRMWARE => meta.cam_firmware = read_text(&mut reader)?,
            IMG_ID => meta.image_id = Some(reader.read_i32()?),
            IMG_IDX => meta.image_idx = Some(reader.read_i32()?),
            IMG_TAP => meta.tap_count = Some(reader.read_i32()?),
            IMG_EXP => meta.exp_time_us = Some(reader.read_i32()?),
            IMG_TIME => meta.time_stamp = Some(reader.read_i32()?),
            COMMENT => meta.comment = read_text(&mut reader)?,
            AFFIX => meta.affix = read_text(&mut reader)?,
            unknown => skip_unknown(&mut reader, unknown)?,
        }
    }
    Ok(meta)
}

fn skip_unknown(reader: &mut StreamReader<'_>, key: i32) -> Result<()> {
    let id = key >> 16;
    match key & 0xFFFF {
        INT32_T => {
            let value = reader.read_i32()?;
            warn!(id, value, "Skipping unexpected int32 metadata record");
        }
        STRING_T => {
            let value = read_text(reader)?.unwrap_or_default();
            warn!(id, %value, "Skipping unexpected string metadata record");
        }
        value_type => {
            // the low byte of the type is a fixed length, 0 means length prefixed
            let mut len = (value_type & 0xFF) as usize;
            if len == 0 {
                len = usize::try_from(reader.read_i32()?).unwrap_or(0);
            }
            let value = reader.read_raw(len)?;
            warn!(
                id,
                value_type,
                len = value.len(),
                "Skipping unexpected metadata record"
            );
        }
    }
    Ok(())
}
