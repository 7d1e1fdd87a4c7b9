//! Serialized form of [`GeoPose`].
//!
//! The timestamp is a julian day, milliseconds since midnight and a time
//! zone kind byte. Whatever the stored kind, the wall clock value is read as UTC.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike, Utc};
use tracing::warn;

use crate::image_pipeline::common::error::{MacsError, Result};
use crate::image_pipeline::container::stream::{StreamReader, StreamWriter};
use crate::image_pipeline::meta::GeoPose;

/// Julian day number of 0001-01-01 minus one, so that
/// `jd = days_from_ce + JULIAN_DAY_OFFSET`.
const JULIAN_DAY_OFFSET: i64 = 1_721_425;

const NULL_JULIAN_DAY: i64 = i64::MIN;
const NULL_TIME: u32 = u32::MAX;

const SPEC_UTC: i8 = 1;
const SPEC_OFFSET_FROM_UTC: i8 = 2;
const SPEC_TIME_ZONE: i8 = 3;

const POSITION_LAT_LON: u8 = 1;
const POSITION_UTM: u8 = 2;

fn write_time(writer: &mut StreamWriter, time: Option<DateTime<Utc>>) {
    match time {
        Some(time) => {
            let jd = i64::from(time.date_naive().num_days_from_ce()) + JULIAN_DAY_OFFSET;
            // leap seconds are folded into the last millisecond
            let millis = (time.nanosecond() / 1_000_000).min(999);
            writer.write_i64(jd);
            writer.write_u32(time.num_seconds_from_midnight() * 1000 + millis);
        }
        None => {
            writer.write_i64(NULL_JULIAN_DAY);
            writer.write_u32(NULL_TIME);
        }
    }
    writer.write_i8(SPEC_UTC);
}

fn read_time(reader: &mut StreamReader<'_>) -> Result<Option<DateTime<Utc>>> {
    let jd = reader.read_i64()?;
    let millis = reader.read_u32()?;
    match reader.read_i8()? {
        SPEC_OFFSET_FROM_UTC => {
            reader.read_i32()?;
        }
        SPEC_TIME_ZONE => {
            // zone id, stored as a length-prefixed UTF-16 string
            reader.read_bytes()?;
        }
        _ => {}
    }

    if jd == NULL_JULIAN_DAY || millis == NULL_TIME {
        return Ok(None);
    }

    let date = i32::try_from(jd - JULIAN_DAY_OFFSET)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt);
    let time =
        NaiveTime::from_num_seconds_from_midnight_opt(millis / 1000, (millis % 1000) * 1_000_000);
    match (date, time) {
        (Some(date), Some(time)) => Ok(Some(date.and_time(time).and_utc())),
        _ => Err(MacsError::FormatError(format!(
            "pose timestamp out of range (julian day {jd}, {millis} ms)"
        ))),
    }
}

pub(crate) fn encode(pose: &GeoPose) -> Vec<u8> {
    let mut writer = StreamWriter::new();
    write_time(&mut writer, pose.time);

    writer.write_u8(POSITION_LAT_LON);
    writer.write_u8(0);
    writer.write_u8(0);

    for value in [
        pose.lat,
        pose.lon,
        pose.alt,
        pose.roll,
        pose.pitch,
        pose.yaw,
        pose.vel_n,
        pose.vel_e,
        pose.vel_up,
    ] {
        writer.write_f64(value);
    }
    writer.into_inner()
}

pub(crate) fn decode(data: &[u8]) -> Result<GeoPose> {
    let mut reader = StreamReader::new(data);
    let mut pose = GeoPose {
        time: read_time(&mut reader)?,
        ..GeoPose::default()
    };

    let position_type = reader.read_u8()?;
    let zone_number = reader.read_u8()?;
    let zone_letter = reader.read_u8()?;
    match (position_type, zone_number, zone_letter) {
        (POSITION_LAT_LON, 0, 0) => {
            pose.lat = reader.read_f64()?;
            pose.lon = reader.read_f64()?;
            pose.alt = reader.read_f64()?;
        }
        (POSITION_UTM, number, letter) => {
            for _ in 0..3 {
                reader.read_f64()?;
            }
            warn!(
                "Geo coordinates are encoded as UTM{}{}, they will be ignored",
                number,
                char::from(letter)
            );
        }
        (other, ..) => {
            return Err(MacsError::FormatError(format!(
                "unsupported position encoding {other}"
            )));
        }
    }

    pose.roll = reader.read_f64()?;
    pose.pitch = reader.read_f64()?;
    pose.yaw = reader.read_f64()?;
    pose.vel_n = reader.read_f64()?;
    pose.vel_e = reader.read_f64()?;
    pose.vel_up = reader.read_f64()?;
    Ok(pose)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_pose() -> GeoPose {
        GeoPose {
            time: Utc
                .with_ymd_and_hms(2023, 7, 14, 3, 27, 46)
                .unwrap()
                .with_nanosecond(170_000_000),
            roll: 0.875_793_131_844_993_4,
            pitch: 2.573_587_893_574_757,
            yaw: 23.812_077_442_224_226,
            lat: 69.517_744_664_608_39,
            lon: -139.092_959_242_558_8,
            alt: 391.843_348_266_556_86,
            vel_n: 57.103_192_015_934_745,
            vel_e: 28.053_951_739_469_827,
            vel_up: -0.170_864_187_211_574_15,
        }
    }

    #[test]
    fn pose_round_trips_exactly() {
        let pose = sample_pose();
        let data = encode(&pose);
        assert_eq!(data.len(), 8 + 4 + 1 + 3 + 9 * 8);
        assert_eq!(decode(&data).unwrap(), pose);
    }

    #[test]
    fn unix_epoch_has_known_julian_day() {
        let mut writer = StreamWriter::new();
        write_time(&mut writer, Some(Utc.timestamp_opt(0, 0).unwrap()));
        let data = writer.into_inner();
        assert_eq!(&data[..8], &2_440_588i64.to_be_bytes());
        assert_eq!(&data[8..12], &0u32.to_be_bytes());
        assert_eq!(data[12], 1);
    }

    #[test]
    fn sub_millisecond_precision_is_dropped() {
        let time = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let pose = GeoPose { time: Some(time), ..GeoPose::default() };
        let decoded = decode(&encode(&pose)).unwrap();
        assert_eq!(
            decoded.time.unwrap(),
            Utc.timestamp_opt(1_700_000_000, 123_000_000).unwrap()
        );
    }

    #[test]
    fn missing_time_round_trips() {
        let pose = GeoPose { lat: 1.0, ..GeoPose::default() };
        assert_eq!(decode(&encode(&pose)).unwrap(), pose);
    }

    #[test]
    fn utm_position_is_ignored() {
        let mut writer = StreamWriter::new();
        write_time(&mut writer, None);
        writer.write_u8(POSITION_UTM);
        writer.write_u8(32);
        writer.write_u8(b'U');
        for v in [500_000.0, 5_400_000.0, 120.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0] {
            writer.write_f64(v);
        }
        let pose = decode(&writer.into_inner()).unwrap();
        assert_eq!((pose.lat, pose.lon, pose.alt), (0.0, 0.0, 0.0));
        assert_eq!((pose.roll, pose.pitch, pose.yaw), (1.0, 2.0, 3.0));
        assert_eq!(pose.vel_up, 6.0);
    }

    #[test]
    fn unknown_position_encoding_is_rejected() {
        let mut data = encode(&sample_pose());
        data[13] = 7;
        assert!(matches!(decode(&data), Err(MacsError::FormatError(_))));
    }
}
