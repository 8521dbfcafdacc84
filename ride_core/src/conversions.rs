//! `From` implementations bridging `ride_config` types to `ride_core` types.

use crate::config::{FusionParams, ModeCfg, MotionCfg, MountingCfg, PostureCfg, RunnerCfg, SpeedCfg};
use crate::types::Axis;

// ── Axis ─────────────────────────────────────────────────────────────────────

impl From<ride_config::Axis> for Axis {
    fn from(a: ride_config::Axis) -> Self {
        match a {
            ride_config::Axis::X => Axis::X,
            ride_config::Axis::Y => Axis::Y,
            ride_config::Axis::Z => Axis::Z,
        }
    }
}

// ── MountingCfg ──────────────────────────────────────────────────────────────

impl From<&ride_config::Mounting> for MountingCfg {
    fn from(c: &ride_config::Mounting) -> Self {
        Self {
            lateral_axis: c.lateral_axis.into(),
            vertical_axis: c.vertical_axis.into(),
            gravity_g: c.gravity_g,
        }
    }
}

// ── MotionCfg ────────────────────────────────────────────────────────────────

impl From<&ride_config::MotionCfg> for MotionCfg {
    fn from(c: &ride_config::MotionCfg) -> Self {
        Self {
            noise_limit_g: c.noise_limit_g,
            move_threshold_g: c.move_threshold_g,
            stop_timeout_ms: c.stop_timeout_ms,
        }
    }
}

// ── SpeedCfg ─────────────────────────────────────────────────────────────────

impl From<&ride_config::SpeedCfg> for SpeedCfg {
    fn from(c: &ride_config::SpeedCfg) -> Self {
        Self {
            gain: c.gain,
            alpha: c.alpha,
            beta: c.beta,
        }
    }
}

// ── PostureCfg ───────────────────────────────────────────────────────────────

impl From<&ride_config::PostureCfg> for PostureCfg {
    fn from(c: &ride_config::PostureCfg) -> Self {
        Self {
            forward_deg: c.forward_deg,
            backward_deg: c.backward_deg,
        }
    }
}

// ── ModeCfg ──────────────────────────────────────────────────────────────────

impl From<&ride_config::ModeCfg> for ModeCfg {
    fn from(c: &ride_config::ModeCfg) -> Self {
        Self {
            stationary_speed_kmh: c.stationary_speed_kmh,
            idle_accel_max_g: c.idle_accel_max_g,
            walk_speed_max_kmh: c.walk_speed_max_kmh,
            walk_accel_min_g: c.walk_accel_min_g,
            walk_accel_max_g: c.walk_accel_max_g,
            ride_speed_max_kmh: c.ride_speed_max_kmh,
            lean_tilt_deg: c.lean_tilt_deg,
            inertial_fallback: c.inertial_fallback,
            fallback_ride_speed: c.fallback_ride_speed,
            fallback_idle_speed: c.fallback_idle_speed,
        }
    }
}

// ── RunnerCfg ────────────────────────────────────────────────────────────────

impl From<&ride_config::RunnerCfg> for RunnerCfg {
    fn from(c: &ride_config::RunnerCfg) -> Self {
        Self {
            tick_hz: c.tick_hz,
            gps_stale_ms: c.gps_stale_ms,
            channel_capacity: c.channel_capacity,
            imu_timeout_ms: c.imu_timeout_ms,
        }
    }
}

// ── FusionParams ─────────────────────────────────────────────────────────────

impl From<&ride_config::Config> for FusionParams {
    fn from(c: &ride_config::Config) -> Self {
        Self {
            mounting: (&c.mounting).into(),
            motion: (&c.motion).into(),
            speed: (&c.speed).into(),
            posture: (&c.posture).into(),
            mode: (&c.mode).into(),
        }
    }
}
