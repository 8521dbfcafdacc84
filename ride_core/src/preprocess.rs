//! Signal preprocessing: tilt, gravity compensation, noise floor, posture.
//!
//! Pure functions of one sample plus static configuration.

use crate::config::{MountingCfg, PostureCfg};
use crate::types::{AccelSample, Axis, Posture};

/// Tilt is kept strictly inside (-90°, 90°).
pub const MAX_TILT_DEG: f64 = 89.999_999;

/// Result of preprocessing one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preprocessed {
    pub tilt_deg: f64,
    /// Gravity-compensated magnitude after the noise floor.
    pub linear_accel_g: f64,
}

#[inline]
fn other_axes(axis: Axis) -> (Axis, Axis) {
    match axis {
        Axis::X => (Axis::Y, Axis::Z),
        Axis::Y => (Axis::X, Axis::Z),
        Axis::Z => (Axis::X, Axis::Y),
    }
}

/// Inclination of the lateral axis relative to the plane of the other two.
pub fn tilt_deg(sample: &AccelSample, lateral: Axis) -> f64 {
    let (a, b) = other_axes(lateral);
    let pa = sample.axis(a);
    let pb = sample.axis(b);
    let deg = sample.axis(lateral).atan2(pa.hypot(pb)).to_degrees();
    deg.clamp(-MAX_TILT_DEG, MAX_TILT_DEG)
}

/// Magnitude of the sample with gravity removed from the vertical axis.
///
/// Only infinite when the true magnitude exceeds `f64::MAX`.
pub fn linear_accel_g(sample: &AccelSample, mounting: &MountingCfg) -> f64 {
    let comp = |axis: Axis| {
        let v = sample.axis(axis);
        if axis == mounting.vertical_axis {
            v - mounting.gravity_g
        } else {
            v
        }
    };
    let (x, y, z) = (comp(Axis::X), comp(Axis::Y), comp(Axis::Z));
    x.hypot(y).hypot(z)
}

/// Clamp sub-noise magnitudes to exactly 0.
#[inline]
pub fn apply_noise_floor(magnitude_g: f64, noise_limit_g: f64) -> f64 {
    if magnitude_g < noise_limit_g {
        0.0
    } else {
        magnitude_g
    }
}

pub fn preprocess(sample: &AccelSample, mounting: &MountingCfg, noise_limit_g: f64) -> Preprocessed {
    Preprocessed {
        tilt_deg: tilt_deg(sample, mounting.lateral_axis),
        linear_accel_g: apply_noise_floor(linear_accel_g(sample, mounting), noise_limit_g),
    }
}

pub fn posture(tilt_deg: f64, cfg: &PostureCfg) -> Posture {
    if tilt_deg > cfg.forward_deg {
        Posture::LeaningForward
    } else if tilt_deg < cfg.backward_deg {
        Posture::LeaningBackward
    } else {
        Posture::Upright
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(x: f64, y: f64, z: f64) -> AccelSample {
        AccelSample::new(x, y, z, 0)
    }

    #[test]
    fn at_rest_is_zero_motion_and_level() {
        let p = preprocess(&s(0.0, 0.0, 1.0), &MountingCfg::default(), 0.03);
        assert_eq!(p.linear_accel_g, 0.0);
        assert_eq!(p.tilt_deg, 0.0);
    }

    #[test]
    fn gravity_removed_from_vertical_axis_only() {
        let m = MountingCfg::default();
        let v = linear_accel_g(&s(0.3, 0.4, 1.0), &m);
        assert!((v - 0.5).abs() < 1e-12);
    }

    #[test]
    fn custom_vertical_axis() {
        let m = MountingCfg {
            lateral_axis: Axis::Z,
            vertical_axis: Axis::X,
            gravity_g: 1.0,
        };
        let v = linear_accel_g(&s(1.0, 0.0, 0.0), &m);
        assert_eq!(v, 0.0);
    }

    #[test]
    fn huge_finite_axes_do_not_overflow() {
        let m = MountingCfg::default();
        let v = linear_accel_g(&s(1e200, 0.0, 1.0), &m);
        assert!(v.is_finite());
        assert!((v / 1e200 - 1.0).abs() < 1e-12);
        let t = tilt_deg(&s(1e200, 1e200, 0.0), Axis::Y);
        assert!((t - 45.0).abs() < 1e-9);
    }

    #[test]
    fn noise_floor_clamps_below_limit() {
        assert_eq!(apply_noise_floor(0.029, 0.03), 0.0);
        assert_eq!(apply_noise_floor(0.03, 0.03), 0.03);
    }

    #[test]
    fn tilt_uses_configured_lateral_axis() {
        let sample = s(1.0, 0.0, 1.0);
        assert!((tilt_deg(&sample, Axis::X) - 45.0).abs() < 1e-9);
        assert_eq!(tilt_deg(&sample, Axis::Y), 0.0);
    }

    #[test]
    fn tilt_stays_inside_open_interval() {
        let t = tilt_deg(&s(0.0, 1.0, 0.0), Axis::Y);
        assert!(t < 90.0 && t > 89.9);
        let t = tilt_deg(&s(0.0, -2.0, 0.0), Axis::Y);
        assert!(t > -90.0 && t < -89.9);
    }

    #[test]
    fn posture_thresholds_are_exclusive() {
        let cfg = PostureCfg::default();
        assert_eq!(posture(10.0, &cfg), Posture::Upright);
        assert_eq!(posture(10.1, &cfg), Posture::LeaningForward);
        assert_eq!(posture(-10.0, &cfg), Posture::Upright);
        assert_eq!(posture(-10.1, &cfg), Posture::LeaningBackward);
    }
}
