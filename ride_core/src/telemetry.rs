//! Flat telemetry record: the only place labels become text.
//!
//! Field names and rounding match the serial/JSON output consumers already
//! parse: two decimals for most values, one for tilt, six for coordinates.
//! Without a GPS fix `lat`, `lon` and `gps_spd` are `null` and `sat` is 0.

use ride_traits::GpsFix;
use serde::Serialize;

use crate::types::{FusionEstimate, Published};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryRecord {
    pub ax: f64,
    pub ay: f64,
    pub az: f64,
    pub tilt: f64,
    pub posture: &'static str,
    pub motion: f64,
    pub moving: bool,
    pub mpu_spd: f64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub gps_spd: Option<f64>,
    pub sat: u32,
    pub mode: &'static str,
}

#[inline]
fn round_to(v: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (v * scale).round() / scale
}

impl TelemetryRecord {
    pub fn from_parts(est: &FusionEstimate, fix: Option<&GpsFix>) -> Self {
        Self {
            ax: round_to(est.accel.x, 2),
            ay: round_to(est.accel.y, 2),
            az: round_to(est.accel.z, 2),
            tilt: round_to(est.tilt_deg, 1),
            posture: est.posture.as_str(),
            motion: round_to(est.motion_intensity, 2),
            moving: est.is_moving,
            mpu_spd: round_to(est.smoothed_speed, 2),
            lat: fix.map(|f| round_to(f.lat_deg, 6)),
            lon: fix.map(|f| round_to(f.lon_deg, 6)),
            gps_spd: est.gps_speed_kmh.map(|v| round_to(v, 2)),
            sat: fix.map_or(0, |f| f.satellites),
            mode: est.mode.as_str(),
        }
    }
}

impl From<&Published> for TelemetryRecord {
    fn from(p: &Published) -> Self {
        Self::from_parts(&p.estimate, p.fix.as_ref())
    }
}
