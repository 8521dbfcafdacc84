#![no_main]
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;

use ride_core::{AccelSample, FusionCore};

#[derive(Debug, Arbitrary)]
struct Tick {
    dt_ms: u16,
    x: f64,
    y: f64,
    z: f64,
    gps: Option<f64>,
}

fuzz_target!(|ticks: Vec<Tick>| {
    let mut core = FusionCore::default();
    let mut now: u64 = 0;
    for t in ticks {
        now = now.wrapping_add(u64::from(t.dt_ms));
        let sample = AccelSample::new(t.x, t.y, t.z, now);
        let Ok(est) = core.tick(sample, t.gps, now) else {
            continue;
        };
        assert!(est.tilt_deg.is_finite() && est.tilt_deg.abs() < 90.0);
        assert!(est.smoothed_speed.is_finite() && est.smoothed_speed >= 0.0);
        assert!(est.is_moving || est.motion_intensity == 0.0);
    }
});
