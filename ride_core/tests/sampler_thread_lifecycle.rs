//! GPS sampler thread lifecycle and staleness.

use std::time::{Duration, Instant};

use ride_core::GpsSampler;
use ride_core::mocks::{FixedGps, NoGps};
use ride_traits::GpsFix;
use ride_traits::clock::MonotonicClock;

fn fix() -> GpsFix {
    GpsFix {
        speed_kmh: 12.0,
        lat_deg: 52.5,
        lon_deg: 13.4,
        satellites: 8,
    }
}

fn wait_for_fix(sampler: &mut GpsSampler) -> Option<GpsFix> {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if let Some(f) = sampler.latest() {
            return Some(f);
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    None
}

#[test]
fn sampler_delivers_latest_fix() {
    let mut sampler = GpsSampler::spawn(FixedGps(fix()), 100, 3000, MonotonicClock::new());
    assert_eq!(wait_for_fix(&mut sampler), Some(fix()));
    // Cached between polls
    assert_eq!(sampler.latest(), Some(fix()));
}

#[test]
fn no_fix_source_yields_none() {
    let mut sampler = GpsSampler::spawn(NoGps, 100, 3000, MonotonicClock::new());
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(sampler.latest(), None);
}

#[test]
fn sampler_thread_exits_on_drop() {
    let sampler = GpsSampler::spawn(FixedGps(fix()), 10, 3000, MonotonicClock::new());
    std::thread::sleep(Duration::from_millis(20));
    // Join happens inside drop; reaching the end means it did not hang
    drop(sampler);
}

#[test]
fn dropping_undrained_sampler_does_not_hang() {
    for _ in 0..10 {
        let sampler = GpsSampler::spawn(FixedGps(fix()), 200, 3000, MonotonicClock::new());
        std::thread::sleep(Duration::from_millis(10));
        drop(sampler);
    }
}

/// Reports one fix and then nothing but errors.
struct OneShotGps(bool);

impl ride_traits::GpsSource for OneShotGps {
    fn poll_fix(&mut self) -> Result<Option<GpsFix>, Box<dyn std::error::Error + Send + Sync>> {
        if self.0 {
            Err(Box::new(std::io::Error::other("uart framing error")))
        } else {
            self.0 = true;
            Ok(Some(fix()))
        }
    }
}

#[test]
fn fix_goes_stale_when_decoder_stops_updating() {
    let mut sampler = GpsSampler::spawn(OneShotGps(false), 100, 30, MonotonicClock::new());
    assert!(wait_for_fix(&mut sampler).is_some());
    std::thread::sleep(Duration::from_millis(80));
    assert_eq!(sampler.latest(), None);
    assert!(sampler.stale_for() > 30);
}
