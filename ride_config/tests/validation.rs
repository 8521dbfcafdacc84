use ride_config::{Axis, GpsMode, load_toml};
use rstest::rstest;

#[test]
fn full_config_parses_and_validates() {
    let toml = r#"
[mounting]
lateral_axis = "x"
vertical_axis = "z"
gravity_g = 1.0

[motion]
noise_limit_g = 0.03
move_threshold_g = 0.12
stop_timeout_ms = 1200

[speed]
gain = 9.5
alpha = 0.7
beta = 0.3

[posture]
forward_deg = 12.0
backward_deg = -8.0

[mode]
stationary_speed_kmh = 1.0
idle_accel_max_g = 0.12
walk_speed_max_kmh = 5.0
walk_accel_min_g = 0.5
walk_accel_max_g = 3.0
ride_speed_max_kmh = 25.0
lean_tilt_deg = 10.0
inertial_fallback = false

[runner]
tick_hz = 10
gps_mode = "direct"
gps_stale_ms = 2000
channel_capacity = 4

[logging]
level = "debug"
rotation = "daily"
"#;

    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.mounting.lateral_axis, Axis::X);
    assert_eq!(cfg.runner.gps_mode, GpsMode::Direct);
    assert!(!cfg.mode.inertial_fallback);
    assert!((cfg.posture.forward_deg - 12.0).abs() < 1e-12);
    // Keys not given keep their defaults
    assert_eq!(cfg.runner.imu_timeout_ms, 50);
}

#[test]
fn unknown_gps_mode_is_a_parse_error() {
    let toml = r#"
[runner]
gps_mode = "carrier-pigeon"
"#;
    assert!(load_toml(toml).is_err());
}

#[rstest]
#[case("[mounting]\nlateral_axis = \"z\"\n", "lateral_axis must differ")]
#[case("[mounting]\ngravity_g = 0.0\n", "gravity_g must be > 0")]
#[case("[motion]\nmove_threshold_g = 0.0\n", "move_threshold_g must be > 0")]
#[case(
    "[motion]\nnoise_limit_g = 0.2\nmove_threshold_g = 0.1\n",
    "noise_limit_g must be below"
)]
#[case("[motion]\nstop_timeout_ms = 0\n", "stop_timeout_ms must be >= 1")]
#[case("[speed]\ngain = -1.0\n", "speed.gain must be > 0")]
#[case("[speed]\nalpha = 1.0\n", "speed.alpha must be in [0.0, 1.0)")]
#[case("[speed]\nbeta = 0.0\n", "speed.beta must be in (0.0, 1.0]")]
#[case("[posture]\nforward_deg = 95.0\n", "posture.forward_deg")]
#[case("[posture]\nbackward_deg = 5.0\n", "posture.backward_deg")]
#[case(
    "[mode]\nwalk_accel_min_g = 3.0\nwalk_accel_max_g = 0.5\n",
    "walk_accel_min_g must be below"
)]
#[case(
    "[mode]\nwalk_speed_max_kmh = 30.0\n",
    "walk_speed_max_kmh must be below"
)]
#[case("[mode]\nstationary_speed_kmh = -1.0\n", "mode.stationary_speed_kmh")]
#[case("[mode]\nfallback_idle_speed = -0.5\n", "mode.fallback_idle_speed")]
#[case("[runner]\ntick_hz = 0\n", "tick_hz must be > 0")]
#[case("[runner]\nchannel_capacity = 0\n", "channel_capacity must be >= 1")]
#[case("[logging]\nrotation = \"weekly\"\n", "logging.rotation")]
fn rejects_out_of_range(#[case] toml: &str, #[case] expected: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject");
    assert!(
        err.to_string().contains(expected),
        "error {err} does not mention {expected}"
    );
}
