#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and recorded-trace parsing for the ride fusion core.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//!   Every section is optional; an empty file yields the tuned defaults.
//! - Trace CSV loader enforces headers and timestamp ordering before the
//!   rows are replayed through the core.
use serde::Deserialize;

/// Accelerometer axis, used to describe the mounting orientation.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Mounting {
    /// Axis whose inclination is reported as tilt.
    pub lateral_axis: Axis,
    /// Axis that carries gravity when the device is at rest.
    pub vertical_axis: Axis,
    /// Gravity magnitude removed from the vertical axis (g).
    pub gravity_g: f64,
}

impl Default for Mounting {
    fn default() -> Self {
        Self {
            lateral_axis: Axis::Y,
            vertical_axis: Axis::Z,
            gravity_g: 1.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MotionCfg {
    /// Net acceleration below this is treated as 0 (g).
    pub noise_limit_g: f64,
    /// Net acceleration above this counts as motion (g).
    pub move_threshold_g: f64,
    /// Quiet time before a stop is declared (ms).
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

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SpeedCfg {
    /// Motion intensity → speed multiplier (sensor/mounting dependent).
    pub gain: f64,
    /// Weight of the previous smoothed value.
    pub alpha: f64,
    /// Weight of the instantaneous estimate.
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

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PostureCfg {
    pub forward_deg: f64,
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

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ModeCfg {
    pub stationary_speed_kmh: f64,
    pub idle_accel_max_g: f64,
    pub walk_speed_max_kmh: f64,
    pub walk_accel_min_g: f64,
    pub walk_accel_max_g: f64,
    pub ride_speed_max_kmh: f64,
    pub lean_tilt_deg: f64,
    /// Classify from inertial signals when GPS has no fix.
    pub inertial_fallback: bool,
    /// Smoothed inertial speed at which the fallback reports a ride.
    pub fallback_ride_speed: f64,
    /// Without a fix, inertial speed below this counts as standing still.
    /// Unitless like `fallback_ride_speed`.
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

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GpsMode {
    /// Background thread owns the GPS decoder and hands over the latest fix.
    #[default]
    Sampler,
    /// Poll the decoder inline on every tick.
    Direct,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RunnerCfg {
    /// Fusion tick rate.
    pub tick_hz: u32,
    pub gps_mode: GpsMode,
    /// A fix older than this is treated as absent (sampler mode only).
    pub gps_stale_ms: u64,
    /// Per-subscriber queue depth of the estimate publisher.
    pub channel_capacity: usize,
    /// Max wait for one IMU read (ms).
    pub imu_timeout_ms: u64,
}

impl Default for RunnerCfg {
    fn default() -> Self {
        Self {
            tick_hz: 5,
            gps_mode: GpsMode::Sampler,
            gps_stale_ms: 3000,
            channel_capacity: 16,
            imu_timeout_ms: 50,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimCfg {
    /// Seed for the simulated sensor noise.
    pub seed: u32,
    /// Tick index at which the simulated GPS loses its fix (None: never).
    pub gps_outage_start: Option<u64>,
    /// Number of ticks the outage lasts.
    pub gps_outage_ticks: u64,
}

impl Default for SimCfg {
    fn default() -> Self {
        Self {
            seed: 0x00C0_FFEE,
            gps_outage_start: None,
            gps_outage_ticks: 0,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub mounting: Mounting,
    pub motion: MotionCfg,
    pub speed: SpeedCfg,
    pub posture: PostureCfg,
    pub mode: ModeCfg,
    pub runner: RunnerCfg,
    pub logging: Logging,
    pub sim: SimCfg,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

fn finite_nonneg(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Mounting
        if self.mounting.lateral_axis == self.mounting.vertical_axis {
            eyre::bail!("mounting.lateral_axis must differ from mounting.vertical_axis");
        }
        if !(self.mounting.gravity_g.is_finite() && self.mounting.gravity_g > 0.0) {
            eyre::bail!("mounting.gravity_g must be > 0");
        }

        // Motion
        if !finite_nonneg(self.motion.noise_limit_g) {
            eyre::bail!("motion.noise_limit_g must be >= 0");
        }
        if !(self.motion.move_threshold_g.is_finite() && self.motion.move_threshold_g > 0.0) {
            eyre::bail!("motion.move_threshold_g must be > 0");
        }
        if self.motion.noise_limit_g >= self.motion.move_threshold_g {
            eyre::bail!("motion.noise_limit_g must be below motion.move_threshold_g");
        }
        if self.motion.stop_timeout_ms == 0 {
            eyre::bail!("motion.stop_timeout_ms must be >= 1");
        }
        if self.motion.stop_timeout_ms > 60 * 1000 {
            eyre::bail!("motion.stop_timeout_ms is unreasonably large (>60s)");
        }

        // Speed
        if !(self.speed.gain.is_finite() && self.speed.gain > 0.0) {
            eyre::bail!("speed.gain must be > 0");
        }
        if !(self.speed.alpha >= 0.0 && self.speed.alpha < 1.0) {
            eyre::bail!("speed.alpha must be in [0.0, 1.0)");
        }
        if !(self.speed.beta > 0.0 && self.speed.beta <= 1.0) {
            eyre::bail!("speed.beta must be in (0.0, 1.0]");
        }

        // Posture
        if !(self.posture.forward_deg.is_finite() && (0.0..90.0).contains(&self.posture.forward_deg))
        {
            eyre::bail!("posture.forward_deg must be in [0, 90)");
        }
        if !(self.posture.backward_deg.is_finite()
            && self.posture.backward_deg > -90.0
            && self.posture.backward_deg <= 0.0)
        {
            eyre::bail!("posture.backward_deg must be in (-90, 0]");
        }

        // Mode
        let m = &self.mode;
        for (name, v) in [
            ("mode.stationary_speed_kmh", m.stationary_speed_kmh),
            ("mode.idle_accel_max_g", m.idle_accel_max_g),
            ("mode.walk_speed_max_kmh", m.walk_speed_max_kmh),
            ("mode.walk_accel_min_g", m.walk_accel_min_g),
            ("mode.walk_accel_max_g", m.walk_accel_max_g),
            ("mode.ride_speed_max_kmh", m.ride_speed_max_kmh),
            ("mode.lean_tilt_deg", m.lean_tilt_deg),
            ("mode.fallback_ride_speed", m.fallback_ride_speed),
            ("mode.fallback_idle_speed", m.fallback_idle_speed),
        ] {
            if !finite_nonneg(v) {
                eyre::bail!("{name} must be a finite value >= 0");
            }
        }
        if m.walk_accel_min_g >= m.walk_accel_max_g {
            eyre::bail!("mode.walk_accel_min_g must be below mode.walk_accel_max_g");
        }
        if m.walk_speed_max_kmh >= m.ride_speed_max_kmh {
            eyre::bail!("mode.walk_speed_max_kmh must be below mode.ride_speed_max_kmh");
        }
        if m.lean_tilt_deg >= 90.0 {
            eyre::bail!("mode.lean_tilt_deg must be below 90");
        }

        // Runner
        if self.runner.tick_hz == 0 {
            eyre::bail!("runner.tick_hz must be > 0");
        }
        if self.runner.tick_hz > 1000 {
            eyre::bail!("runner.tick_hz must be <= 1000");
        }
        if self.runner.gps_stale_ms == 0 {
            eyre::bail!("runner.gps_stale_ms must be >= 1");
        }
        if self.runner.channel_capacity == 0 {
            eyre::bail!("runner.channel_capacity must be >= 1");
        }
        if self.runner.imu_timeout_ms == 0 {
            eyre::bail!("runner.imu_timeout_ms must be >= 1");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}

/// Recorded trace CSV schema.
///
/// Expected headers:
/// t_ms,ax,ay,az,gps_kmh
///
/// `gps_kmh` is left empty for rows recorded without a fix.
///
/// Example:
/// t_ms,ax,ay,az,gps_kmh
/// 0,0.00,0.00,1.00,
/// 200,0.61,0.02,1.01,3.2
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct TraceRow {
    pub t_ms: u64,
    pub ax: f64,
    pub ay: f64,
    pub az: f64,
    pub gps_kmh: Option<f64>,
}

pub const TRACE_HEADERS: [&str; 5] = ["t_ms", "ax", "ay", "az", "gps_kmh"];

/// Check trace rows for replay: at least one row, non-decreasing timestamps,
/// finite accelerometer values.
pub fn check_trace(rows: &[TraceRow]) -> eyre::Result<()> {
    if rows.is_empty() {
        eyre::bail!("trace has no rows");
    }
    for (i, r) in rows.iter().enumerate() {
        if !(r.ax.is_finite() && r.ay.is_finite() && r.az.is_finite()) {
            eyre::bail!("trace row {} has a non-finite acceleration value", i + 2);
        }
        if i > 0 && r.t_ms < rows[i - 1].t_ms {
            eyre::bail!(
                "trace timestamps must be non-decreasing (row {} goes back in time)",
                i + 2
            );
        }
    }
    Ok(())
}

pub fn load_trace_csv(path: &std::path::Path) -> eyre::Result<Vec<TraceRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open trace CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != TRACE_HEADERS {
        eyre::bail!(
            "trace CSV must have headers '{}', got: {}",
            TRACE_HEADERS.join(","),
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<TraceRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }

    check_trace(&rows)?;
    Ok(rows)
}
