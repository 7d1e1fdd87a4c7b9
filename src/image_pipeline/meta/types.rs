//! Descriptive records attached to a capture

use chrono::{DateTime, Utc};

/// Camera identity and per-capture information.
///
/// Every field is optional; absent fields are not written to the
/// container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaData {
    pub cam_vendor: Option<String>,
    pub cam_model: Option<String>,
    pub cam_name: Option<String>,
    pub cam_serial: Option<String>,
    pub cam_mac: Option<String>,
    pub cam_ip: Option<String>,
    pub cam_firmware: Option<String>,

    pub image_id: Option<i32>,
    pub image_idx: Option<i32>,
    /// Number of sensor output taps.
    pub tap_count: Option<i32>,
    /// Exposure time in microseconds.
    pub exp_time_us: Option<i32>,
    /// Device clock ticks at capture time.
    pub time_stamp: Option<i32>,
    pub affix: Option<String>,

    pub comment: Option<String>,
}

/// Position, attitude and velocity at capture time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeoPose {
    pub time: Option<DateTime<Utc>>,
    /// Degrees.
    pub lat: f64,
    /// Degrees.
    pub lon: f64,
    /// Meters.
    pub alt: f64,
    /// Degrees.
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
    /// Velocity north, m/s.
    pub vel_n: f64,
    /// Velocity east, m/s.
    pub vel_e: f64,
    /// Velocity up, m/s.
    pub vel_up: f64,
}

impl GeoPose {
    pub fn is_valid(&self) -> bool {
        self.time.is_some()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        *self == GeoPose::default()
    }

    /// Ground speed magnitude in m/s.
    pub fn speed(&self) -> f64 {
        (self.vel_n * self.vel_n + self.vel_e * self.vel_e + self.vel_up * self.vel_up).sqrt()
    }
}
