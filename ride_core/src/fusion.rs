//! Per-tick fusion orchestrator.
//!
//! One `tick` runs: sample validation, GPS sanitizing, preprocessing,
//! debounce, speed smoothing, posture and mode classification, then builds
//! a fresh `FusionEstimate`. The only state carried across ticks is the
//! debouncer's `MotionState` and the smoothed speed.

use crate::classify::{ModeSignals, classify};
use crate::config::FusionParams;
use crate::context::SensorContext;
use crate::debounce::MotionDebouncer;
use crate::error::{BuildError, FusionError};
use crate::preprocess::{posture, preprocess};
use crate::speed::SpeedEstimator;
use crate::types::{AccelSample, FusionEstimate, MotionState, Published};

#[derive(Debug, Clone)]
pub struct FusionCore {
    params: FusionParams,
    debouncer: MotionDebouncer,
    speed: SpeedEstimator,
    current: Option<FusionEstimate>,
}

impl Default for FusionCore {
    fn default() -> Self {
        Self {
            params: FusionParams::default(),
            debouncer: MotionDebouncer::new(),
            speed: SpeedEstimator::new(),
            current: None,
        }
    }
}

/// Drop GPS speeds that cannot be real. Absence is the only "no fix" signal.
fn sanitize_gps(gps_speed_kmh: Option<f64>) -> Option<f64> {
    match gps_speed_kmh {
        Some(v) if v.is_finite() && v >= 0.0 => Some(v),
        Some(v) => {
            tracing::warn!(gps_speed_kmh = v, "discarding invalid gps speed");
            None
        }
        None => None,
    }
}

impl FusionCore {
    pub fn new(params: FusionParams) -> Result<Self, BuildError> {
        params.validate()?;
        Ok(Self {
            params,
            ..Self::default()
        })
    }

    pub fn params(&self) -> &FusionParams {
        &self.params
    }

    /// Swap parameters. Motion state and smoothed speed carry over.
    pub fn configure(&mut self, params: FusionParams) -> Result<(), BuildError> {
        params.validate()?;
        self.params = params;
        tracing::info!(?params, "fusion parameters updated");
        Ok(())
    }

    /// Back to stopped with zero speed; forget the last estimate.
    pub fn reset(&mut self) {
        self.debouncer.reset();
        self.speed.reset();
        self.current = None;
    }

    /// Estimate from the most recent successful tick.
    pub fn current(&self) -> Option<FusionEstimate> {
        self.current
    }

    pub fn motion_state(&self) -> MotionState {
        self.debouncer.state()
    }

    pub fn smoothed_speed(&self) -> f64 {
        self.speed.smoothed()
    }

    /// Advance one tick.
    ///
    /// A sample with a non-finite axis, or one whose magnitude overflows, is
    /// rejected with [`FusionError::InvalidSample`] before any state is touched.
    pub fn tick(
        &mut self,
        accel: AccelSample,
        gps_speed_kmh: Option<f64>,
        now_ms: u64,
    ) -> Result<FusionEstimate, FusionError> {
        if let Some((axis, value)) = accel.first_non_finite() {
            tracing::warn!(%axis, value, now_ms, "rejecting non-finite sample");
            return Err(FusionError::InvalidSample { axis, value });
        }
        let gps = sanitize_gps(gps_speed_kmh);
        let p = &self.params;

        let pre = preprocess(&accel, &p.mounting, p.motion.noise_limit_g);
        if !pre.linear_accel_g.is_finite() {
            let (axis, value) = accel.dominant_axis();
            tracing::warn!(%axis, value, now_ms, "rejecting sample with overflowing magnitude");
            return Err(FusionError::InvalidSample { axis, value });
        }
        let motion = self.debouncer.update(pre.linear_accel_g, now_ms, &p.motion);
        let smoothed_speed = self.speed.update(&motion, &p.speed);
        let mode = classify(
            &p.mode,
            &ModeSignals {
                gps_speed_kmh: gps,
                tilt_deg: pre.tilt_deg,
                accel_g: pre.linear_accel_g,
                inertial_speed: smoothed_speed,
            },
        );

        let est = FusionEstimate {
            timestamp_ms: now_ms,
            accel,
            linear_accel_g: pre.linear_accel_g,
            tilt_deg: pre.tilt_deg,
            posture: posture(pre.tilt_deg, &p.posture),
            motion_intensity: motion.motion_intensity,
            is_moving: motion.is_moving,
            smoothed_speed,
            gps_speed_kmh: gps,
            mode,
        };
        tracing::trace!(
            t_ms = now_ms,
            accel_g = est.linear_accel_g,
            tilt = est.tilt_deg,
            moving = est.is_moving,
            speed = est.smoothed_speed,
            mode = est.mode.as_str(),
            "tick"
        );
        if self.current.is_some_and(|prev| prev.mode != mode) {
            tracing::debug!(t_ms = now_ms, mode = mode.as_str(), "mode change");
        }
        self.current = Some(est);
        Ok(est)
    }

    /// Read the context's sensors and tick once.
    ///
    /// IMU failures are returned; a failing GPS is treated as having no fix.
    pub fn step(&mut self, ctx: &mut SensorContext) -> Result<Published, FusionError> {
        let sample = ctx.read_accel()?;
        let fix = ctx.read_fix().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "gps read failed, continuing without fix");
            None
        });
        let estimate = self.tick(sample, fix.map(|f| f.speed_kmh), sample.timestamp_ms)?;
        // Keep position only alongside a speed the core accepted
        let fix = fix.filter(|_| estimate.gps_speed_kmh.is_some());
        Ok(Published { estimate, fix })
    }
}
