//! Moving/stopped debouncer with a stop-timeout hold.
//!
//! A strong sample (> move threshold) switches to Moving immediately and
//! refreshes the intensity. Weak samples leave the intensity untouched; only
//! when no strong sample has arrived for longer than the stop timeout does
//! the state drop to Stopped, resetting the intensity to 0.

use crate::config::MotionCfg;
use crate::types::MotionState;
use crate::util::elapsed_ms;

#[derive(Debug, Clone, Default)]
pub struct MotionDebouncer {
    state: MotionState,
}

impl MotionDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = MotionState::default();
    }

    /// Feed one post-noise-floor magnitude observed at `now_ms`.
    pub fn update(&mut self, linear_accel_g: f64, now_ms: u64, cfg: &MotionCfg) -> MotionState {
        if linear_accel_g > cfg.move_threshold_g {
            if !self.state.is_moving {
                tracing::debug!(
                    accel_g = linear_accel_g,
                    now_ms,
                    "motion start"
                );
            }
            self.state = MotionState {
                is_moving: true,
                motion_intensity: linear_accel_g,
                last_motion_ms: now_ms,
            };
        } else if self.state.is_moving {
            let quiet_ms = elapsed_ms(now_ms, self.state.last_motion_ms);
            if quiet_ms > cfg.stop_timeout_ms {
                tracing::debug!(quiet_ms, now_ms, "motion stop");
                self.state.is_moving = false;
                self.state.motion_intensity = 0.0;
            }
        }
        self.state
    }
}
