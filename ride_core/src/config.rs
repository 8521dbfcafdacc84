//! Configuration types for the fusion core.
//!
//! These are the runtime configuration structs used by `FusionCore`.
//! They are separate from the TOML-deserialized config in `ride_config`.

use crate::error::BuildError;
use crate::types::Axis;

/// Mounting orientation of the sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MountingCfg {
    /// Axis reported as tilt.
    pub lateral_axis: Axis,
    /// Axis carrying gravity at rest.
    pub vertical_axis: Axis,
    /// Gravity removed from the vertical axis (g). Default: 1.0.
    pub gravity_g: f64,
}

impl Default for MountingCfg {
    fn default() -> Self {
        Self {
            lateral_axis: Axis::Y,
            vertical_axis: Axis::Z,
            gravity_g: 1.0,
        }
    }
}

/// Noise floor and debounce parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionCfg {
    /// Net acceleration below this is clamped to 0. Default: 0.03 g.
    pub noise_limit_g: f64,
    /// Net acceleration above this is motion. Default: 0.12 g.
    pub move_threshold_g: f64,
    /// Quiet time before a stop is declared. Default: 1200 ms.
    pub stop_timeout_ms: u64,
}

impl Default for MotionCfg {
    fn default() -> Self {
        Self {
            noise_limit_g: 0.03,
            move_threshold_g: 0.12,
            stop_timeout_ms: 1200,
        }
    }
}

/// Inertial speed estimate: gain and low-pass weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedCfg {
    /// Motion intensity → speed multiplier. Tuned per sensor and mounting.
    pub gain: f64,
    /// Weight of the previous smoothed value. Range: [0.0, 1.0).
    pub alpha: f64,
    /// Weight of the instantaneous estimate. Range: (0.0, 1.0].
    pub beta: f64,
}

impl Default for SpeedCfg {
    fn default() -> Self {
        Self {
            gain: 9.5,
            alpha: 0.7,
            beta: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostureCfg {
    /// Tilt above this is leaning forward.
    pub forward_deg: f64,
    /// Tilt below this is leaning backward.
    pub backward_deg: f64,
}

impl Default for PostureCfg {
    fn default() -> Self {
        Self {
            forward_deg: 10.0,
            backward_deg: -10.0,
        }
    }
}

/// Breakpoints of the ordered mode rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeCfg {
    /// Speeds below this count as no speed evidence.
    pub stationary_speed_kmh: f64,
    /// Linear acceleration at or below this is idle.
    pub idle_accel_max_g: f64,
    /// Walking is only reported below this GPS speed; riding starts here.
    pub walk_speed_max_kmh: f64,
    /// Exclusive walking band on linear acceleration.
    pub walk_accel_min_g: f64,
    pub walk_accel_max_g: f64,
    /// At or above this GPS speed the rider is on a bike regardless of tilt.
    pub ride_speed_max_kmh: f64,
    /// |tilt| above this separates a leaned-in bike from an upright scooter.
    pub lean_tilt_deg: f64,
    /// Classify from inertial signals when GPS has no fix.
    pub inertial_fallback: bool,
    /// Smoothed inertial speed at which the fallback reports a ride.
    pub fallback_ride_speed: f64,
    /// Without a fix, inertial speed below this counts as no speed evidence.
    /// Same unitless scale as `fallback_ride_speed`, not km/h.
    pub fallback_idle_speed: f64,
}

impl Default for ModeCfg {
    fn default() -> Self {
        Self {
            stationary_speed_kmh: 1.0,
            idle_accel_max_g: 0.12,
            walk_speed_max_kmh: 5.0,
            walk_accel_min_g: 0.5,
            walk_accel_max_g: 3.0,
            ride_speed_max_kmh: 25.0,
            lean_tilt_deg: 10.0,
            inertial_fallback: true,
            fallback_ride_speed: 1.0,
            fallback_idle_speed: 1.0,
        }
    }
}

/// Everything `configure` accepts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FusionParams {
    pub mounting: MountingCfg,
    pub motion: MotionCfg,
    pub speed: SpeedCfg,
    pub posture: PostureCfg,
    pub mode: ModeCfg,
}

fn finite_nonneg(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

impl FusionParams {
    /// Reject parameter sets that would break the estimate invariants.
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.mounting.lateral_axis == self.mounting.vertical_axis {
            return Err(BuildError::InvalidConfig(
                "lateral and vertical axis must differ",
            ));
        }
        if !(self.mounting.gravity_g.is_finite() && self.mounting.gravity_g > 0.0) {
            return Err(BuildError::InvalidConfig("gravity_g must be > 0"));
        }
        if !finite_nonneg(self.motion.noise_limit_g) {
            return Err(BuildError::InvalidConfig("noise_limit_g must be >= 0"));
        }
        if !(self.motion.move_threshold_g.is_finite() && self.motion.move_threshold_g > 0.0) {
            return Err(BuildError::InvalidConfig("move_threshold_g must be > 0"));
        }
        if self.motion.noise_limit_g >= self.motion.move_threshold_g {
            return Err(BuildError::InvalidConfig(
                "noise_limit_g must be below move_threshold_g",
            ));
        }
        if self.motion.stop_timeout_ms == 0 {
            return Err(BuildError::InvalidConfig("stop_timeout_ms must be >= 1"));
        }
        if !(self.speed.gain.is_finite() && self.speed.gain > 0.0) {
            return Err(BuildError::InvalidConfig("speed gain must be > 0"));
        }
        if !(self.speed.alpha >= 0.0 && self.speed.alpha < 1.0) {
            return Err(BuildError::InvalidConfig("speed alpha must be in [0, 1)"));
        }
        if !(self.speed.beta > 0.0 && self.speed.beta <= 1.0) {
            return Err(BuildError::InvalidConfig("speed beta must be in (0, 1]"));
        }
        if !(self.posture.forward_deg.is_finite() && self.posture.backward_deg.is_finite())
            || self.posture.backward_deg > self.posture.forward_deg
        {
            return Err(BuildError::InvalidConfig(
                "posture backward_deg must not exceed forward_deg",
            ));
        }
        let m = &self.mode;
        if ![
            m.stationary_speed_kmh,
            m.idle_accel_max_g,
            m.walk_speed_max_kmh,
            m.walk_accel_min_g,
            m.walk_accel_max_g,
            m.ride_speed_max_kmh,
            m.lean_tilt_deg,
            m.fallback_ride_speed,
            m.fallback_idle_speed,
        ]
        .into_iter()
        .all(finite_nonneg)
        {
            return Err(BuildError::InvalidConfig(
                "mode breakpoints must be finite and >= 0",
            ));
        }
        if m.walk_accel_min_g >= m.walk_accel_max_g {
            return Err(BuildError::InvalidConfig(
                "walk_accel_min_g must be below walk_accel_max_g",
            ));
        }
        if m.walk_speed_max_kmh >= m.ride_speed_max_kmh {
            return Err(BuildError::InvalidConfig(
                "walk_speed_max_kmh must be below ride_speed_max_kmh",
            ));
        }
        Ok(())
    }
}

/// Scheduler-side settings (not part of the pure core).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerCfg {
    pub tick_hz: u32,
    pub gps_stale_ms: u64,
    pub channel_capacity: usize,
    pub imu_timeout_ms: u64,
}

impl Default for RunnerCfg {
    fn default() -> Self {
        Self {
            tick_hz: 5,
            gps_stale_ms: 3000,
            channel_capacity: 16,
            imu_timeout_ms: 50,
        }
    }
}
