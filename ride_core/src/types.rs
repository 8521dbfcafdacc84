//! Value types flowing through one fusion tick.

use ride_traits::{AccelReading, GpsFix};

/// Accelerometer axis. Mounting orientation names one of these as lateral
/// (tilt) and one as vertical (carries gravity at rest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl core::fmt::Display for Axis {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One accelerometer sample in g with its monotonic timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AccelSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub timestamp_ms: u64,
}

impl AccelSample {
    pub const fn new(x: f64, y: f64, z: f64, timestamp_ms: u64) -> Self {
        Self {
            x,
            y,
            z,
            timestamp_ms,
        }
    }

    pub fn from_reading(r: AccelReading, timestamp_ms: u64) -> Self {
        Self::new(r.x, r.y, r.z, timestamp_ms)
    }

    #[inline]
    pub fn axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Axis with the largest magnitude; ties go to the earlier axis.
    pub fn dominant_axis(&self) -> (Axis, f64) {
        [Axis::Y, Axis::Z]
            .into_iter()
            .map(|a| (a, self.axis(a)))
            .fold((Axis::X, self.x), |best, cur| {
                if cur.1.abs() > best.1.abs() { cur } else { best }
            })
    }

    /// First non-finite axis, if any.
    pub fn first_non_finite(&self) -> Option<(Axis, f64)> {
        [Axis::X, Axis::Y, Axis::Z]
            .into_iter()
            .map(|a| (a, self.axis(a)))
            .find(|(_, v)| !v.is_finite())
    }
}

/// Coarse travel mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeLabel {
    Stationary,
    Walking,
    Scooter,
    Bike,
    Unknown,
}

impl ModeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeLabel::Stationary => "Stationary",
            ModeLabel::Walking => "Walking",
            ModeLabel::Scooter => "Scooter",
            ModeLabel::Bike => "Bike",
            ModeLabel::Unknown => "Unknown",
        }
    }
}

/// Rider posture derived from tilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Posture {
    LeaningForward,
    LeaningBackward,
    Upright,
}

impl Posture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Posture::LeaningForward => "Leaning Forward",
            Posture::LeaningBackward => "Leaning Backward",
            Posture::Upright => "Upright",
        }
    }
}

/// Debounced motion state. `motion_intensity` is 0 whenever `is_moving` is false.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionState {
    pub is_moving: bool,
    pub motion_intensity: f64,
    pub last_motion_ms: u64,
}

/// Snapshot produced by one tick. Plain value, no link back to the core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionEstimate {
    pub timestamp_ms: u64,
    pub accel: AccelSample,
    pub linear_accel_g: f64,
    pub tilt_deg: f64,
    pub posture: Posture,
    pub motion_intensity: f64,
    pub is_moving: bool,
    pub smoothed_speed: f64,
    pub gps_speed_kmh: Option<f64>,
    pub mode: ModeLabel,
}

/// An estimate paired with the GPS fix it was computed with, as handed to
/// the telemetry boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Published {
    pub estimate: FusionEstimate,
    pub fix: Option<GpsFix>,
}
