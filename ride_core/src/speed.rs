//! Inertial speed estimate: motion intensity scaled by a gain, then passed
//! through a fixed-weight exponential low-pass.

use crate::config::SpeedCfg;
use crate::types::MotionState;

#[derive(Debug, Clone, Default)]
pub struct SpeedEstimator {
    smoothed: f64,
}

impl SpeedEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn smoothed(&self) -> f64 {
        self.smoothed
    }

    pub fn reset(&mut self) {
        self.smoothed = 0.0;
    }

    /// Unsmoothed estimate for the current motion state.
    #[inline]
    pub fn instantaneous(state: &MotionState, cfg: &SpeedCfg) -> f64 {
        if state.is_moving {
            state.motion_intensity * cfg.gain
        } else {
            0.0
        }
    }

    pub fn update(&mut self, state: &MotionState, cfg: &SpeedCfg) -> f64 {
        let inst = Self::instantaneous(state, cfg);
        let y = cfg.alpha * self.smoothed + cfg.beta * inst;
        // An overflowing product saturates so the low-pass can still decay it
        self.smoothed = y.clamp(0.0, f64::MAX);
        tracing::trace!(inst, smoothed = self.smoothed, "speed update");
        self.smoothed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moving(intensity: f64) -> MotionState {
        MotionState {
            is_moving: true,
            motion_intensity: intensity,
            last_motion_ms: 0,
        }
    }

    #[test]
    fn overflowing_product_saturates_and_decays() {
        let cfg = SpeedCfg::default();
        let mut e = SpeedEstimator::new();
        assert_eq!(e.update(&moving(f64::MAX), &cfg), f64::MAX);
        let stopped = MotionState::default();
        let mut prev = e.smoothed();
        for _ in 0..2500 {
            let v = e.update(&stopped, &cfg);
            assert!(v.is_finite() && v <= prev);
            prev = v;
        }
        assert!(prev < 1e-9);
    }

    #[test]
    fn first_step_is_beta_times_instantaneous() {
        let cfg = SpeedCfg::default();
        let mut e = SpeedEstimator::new();
        let v = e.update(&moving(1.0), &cfg);
        assert!((v - 0.3 * 9.5).abs() < 1e-12);
    }

    #[test]
    fn decays_geometrically_after_stop() {
        let cfg = SpeedCfg::default();
        let mut e = SpeedEstimator::new();
        e.update(&moving(1.0), &cfg);
        let before = e.smoothed();
        let after = e.update(&MotionState::default(), &cfg);
        assert!((after - 0.7 * before).abs() < 1e-12);
    }
}
