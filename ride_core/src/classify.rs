//! Ordered threshold rules mapping one tick's signals to a travel mode.
//!
//! The bands overlap on purpose, so rule order matters: the first match wins.

use crate::config::ModeCfg;
use crate::types::ModeLabel;

/// Inputs to [`classify`]. Everything the rules may look at, nothing else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeSignals {
    /// `None` when the receiver has no fix.
    pub gps_speed_kmh: Option<f64>,
    pub tilt_deg: f64,
    /// Post-noise-floor linear acceleration.
    pub accel_g: f64,
    /// Smoothed inertial speed estimate.
    pub inertial_speed: f64,
}

#[inline]
fn in_walk_band(accel_g: f64, cfg: &ModeCfg) -> bool {
    accel_g > cfg.walk_accel_min_g && accel_g < cfg.walk_accel_max_g
}

#[inline]
fn ride_label(tilt_deg: f64, cfg: &ModeCfg) -> ModeLabel {
    if tilt_deg.abs() > cfg.lean_tilt_deg {
        ModeLabel::Bike
    } else {
        ModeLabel::Scooter
    }
}

/// Classify one tick. Pure: equal inputs always give equal labels.
pub fn classify(cfg: &ModeCfg, s: &ModeSignals) -> ModeLabel {
    let no_speed_evidence = match s.gps_speed_kmh {
        Some(v) => v < cfg.stationary_speed_kmh,
        None => s.inertial_speed < cfg.fallback_idle_speed,
    };
    if no_speed_evidence && s.accel_g <= cfg.idle_accel_max_g {
        return ModeLabel::Stationary;
    }

    match s.gps_speed_kmh {
        Some(v) if v < cfg.walk_speed_max_kmh => {
            if in_walk_band(s.accel_g, cfg) {
                ModeLabel::Walking
            } else {
                ModeLabel::Unknown
            }
        }
        Some(v) if v < cfg.ride_speed_max_kmh => ride_label(s.tilt_deg, cfg),
        Some(_) => ModeLabel::Bike,
        None if cfg.inertial_fallback => {
            if in_walk_band(s.accel_g, cfg) {
                ModeLabel::Walking
            } else if s.inertial_speed >= cfg.fallback_ride_speed {
                ride_label(s.tilt_deg, cfg)
            } else {
                ModeLabel::Unknown
            }
        }
        None => ModeLabel::Unknown,
    }
}
