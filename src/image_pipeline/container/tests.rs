use chrono::{TimeZone, Utc};

use crate::image_pipeline::common::error::MacsError;
use crate::image_pipeline::container::format::{HEADER_SIZE, PayloadCompression};
use crate::image_pipeline::container::stream::StreamWriter;
use crate::image_pipeline::container::{read_container, write_container};
use crate::image_pipeline::meta::{GeoPose, MetaData};
use crate::image_pipeline::raw::unpack::pack_12bit_le;
use crate::image_pipeline::raw::{PixelEndianness, PixelFormat, RawImage};

fn sample_raw() -> RawImage {
    let samples: Vec<u16> = (0..8 * 6).map(|i| (i * 1000) as u16).collect();
    RawImage::from_samples(&samples, 8, 6, PixelFormat::BayerGR16).unwrap()
}

fn sample_meta() -> MetaData {
    MetaData {
        cam_vendor: Some("DLR-OS".to_string()),
        cam_name: Some("Cam-RGB-50".to_string()),
        image_id: Some(2135),
        tap_count: Some(4),
        exp_time_us: Some(600),
        comment: Some("test strip".to_string()),
        ..MetaData::default()
    }
}

fn sample_pose() -> GeoPose {
    GeoPose {
        time: Some(Utc.with_ymd_and_hms(2022, 6, 1, 10, 0, 0).unwrap()),
        lat: 52.5,
        lon: 13.4,
        alt: 1200.0,
        yaw: 90.0,
        vel_n: 50.0,
        ..GeoPose::default()
    }
}

#[test]
fn round_trip_preserves_everything() {
    let raw = sample_raw();
    for compression in [PayloadCompression::None, PayloadCompression::Zlib] {
        let data = write_container(
            &raw,
            &sample_meta(),
            &sample_pose(),
            Some(b"\xFF\xD8jpeg"),
            compression,
        )
        .unwrap();
        let contents = read_container(&data).unwrap();
        assert_eq!(contents.raw, raw);
        assert_eq!(contents.meta, sample_meta());
        assert_eq!(contents.pose, sample_pose());
        assert_eq!(contents.preview.as_deref(), Some(&b"\xFF\xD8jpeg"[..]));
    }
}

#[test]
fn empty_pose_and_preview_are_omitted() {
    let data = write_container(
        &sample_raw(),
        &MetaData::default(),
        &GeoPose::default(),
        None,
        PayloadCompression::None,
    )
    .unwrap();
    // geo and preview offsets in the table of contents
    assert_eq!(&data[20..24], &[0, 0, 0, 0]);
    assert_eq!(&data[28..32], &[0, 0, 0, 0]);

    let contents = read_container(&data).unwrap();
    assert_eq!(contents.pose, GeoPose::default());
    assert_eq!(contents.meta, MetaData::default());
    assert_eq!(contents.preview, None);
}

#[test]
fn padded_packed_rows_round_trip() {
    // 4x2 BayerRG12Packed with 3 padding bytes per row
    let mut data = Vec::new();
    for row in [[0x010, 0x020, 0x030, 0x040], [0x050, 0x060, 0x070, 0x080]] {
        data.extend(pack_12bit_le(&row));
        data.extend([0, 0, 0]);
    }
    let raw = RawImage::new(
        data,
        4,
        2,
        9,
        PixelFormat::BayerRG12Packed,
        PixelEndianness::Little,
    )
    .unwrap();

    let encoded = write_container(
        &raw,
        &MetaData::default(),
        &GeoPose::default(),
        None,
        PayloadCompression::Zlib,
    )
    .unwrap();
    let decoded = read_container(&encoded).unwrap().raw;
    assert_eq!(decoded, raw);
    assert_eq!(decoded.pixel_pitch(), 6);
}

#[test]
fn truncated_container_is_rejected() {
    let data = write_container(
        &sample_raw(),
        &sample_meta(),
        &sample_pose(),
        None,
        PayloadCompression::None,
    )
    .unwrap();
    for len in [0, 10, HEADER_SIZE, data.len() - 1] {
        let err = read_container(&data[..len]).unwrap_err();
        assert!(matches!(err, MacsError::FormatError(_)), "len {len}: {err}");
    }
}

#[test]
fn declared_size_must_match_payload() {
    let mut data = write_container(
        &sample_raw(),
        &MetaData::default(),
        &GeoPose::default(),
        None,
        PayloadCompression::None,
    )
    .unwrap();
    // image size field follows magic, version and the table of contents
    data[40..44].copy_from_slice(&95u32.to_be_bytes());
    assert!(matches!(
        read_container(&data),
        Err(MacsError::SizeMismatch { expected: 95, actual: 96, .. })
    ));
}

#[test]
fn huge_declared_size_in_small_file_is_rejected() {
    let mut data = write_container(
        &sample_raw(),
        &MetaData::default(),
        &GeoPose::default(),
        None,
        PayloadCompression::Zlib,
    )
    .unwrap();
    data[40..44].copy_from_slice(&u32::MAX.to_be_bytes());
    // length prefix of the zlib stream, after the block magic and size
    let block = data.windows(4).position(|w| w == b"MID#").unwrap();
    data[block + 8..block + 12].copy_from_slice(&u32::MAX.to_be_bytes());

    assert!(matches!(
        read_container(&data),
        Err(MacsError::SizeMismatch { actual: 96, .. })
    ));
}

#[test]
fn invalid_raw_image_is_not_written() {
    let err = write_container(
        &RawImage::default(),
        &MetaData::default(),
        &GeoPose::default(),
        None,
        PayloadCompression::None,
    )
    .unwrap_err();
    assert!(matches!(err, MacsError::UnsupportedFormat(_)));
}

#[test]
fn unknown_version_is_rejected() {
    let mut data = write_container(
        &sample_raw(),
        &MetaData::default(),
        &GeoPose::default(),
        None,
        PayloadCompression::None,
    )
    .unwrap();
    data[4..8].copy_from_slice(&7i32.to_be_bytes());
    assert!(matches!(read_container(&data), Err(MacsError::UnsupportedVersion(7))));
}

#[test]
fn reads_version_1_big_endian_packed_file() {
    let payload = vec![0xAB, 0x3C, 0x12, 0x00, 0x00, 0x00];
    let offset_data = 16 * 4 + 8;

    let mut writer = StreamWriter::new();
    writer.write_raw(b"MIC#");
    writer.write_i32(1);
    for (tag, offset) in [
        (0x0100_0000, 16 * 4),
        (0x0200_0000, 0),
        (0x0300_0000, 0),
        (0x0400_0000, offset_data),
    ] {
        writer.write_i32(tag);
        writer.write_i32(offset);
    }
    for value in [6, 2, 2, 2, PixelFormat::Mono12Packed.code(), 0] {
        writer.write_u32(value);
    }
    writer.write_raw(b"MMD#");
    writer.write_u32(0);
    writer.write_raw(b"MID#");
    writer.write_u32(payload.len() as u32);
    writer.write_raw(&payload);

    let contents = read_container(&writer.into_inner()).unwrap();
    assert_eq!(contents.raw.endianness(), PixelEndianness::Big);
    assert_eq!(contents.raw.pitch(), 3);
    assert_eq!(contents.raw.samples().unwrap(), vec![0xABC0, 0x1230, 0, 0]);
    assert_eq!(contents.meta, MetaData::default());
}

#[test]
fn unknown_pixel_format_is_rejected() {
    let mut data = write_container(
        &sample_raw(),
        &MetaData::default(),
        &GeoPose::default(),
        None,
        PayloadCompression::None,
    )
    .unwrap();
    // format field
    data[56..60].copy_from_slice(&0x0BAD_F00Du32.to_be_bytes());
    assert!(matches!(read_container(&data), Err(MacsError::UnsupportedFormat(_))));
}
