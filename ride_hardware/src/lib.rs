//! Simulated IMU and GPS collaborators.
//!
//! Both replay a scripted ride profile (rest, walk, scooter, lean-in bike,
//! stop) one segment after another and loop. The IMU adds seeded noise; the
//! GPS integrates position from the segment speed and can be given an outage
//! window during which it reports no fix.
pub mod error;

use std::ops::Range;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use ride_traits::{AccelReading, GpsFix, GpsSource, Imu};

use crate::error::HwError;

/// Metres per degree of latitude.
const METRES_PER_DEG: f64 = 111_320.0;

/// One stretch of the scripted ride.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub label: &'static str,
    /// Length in sensor reads.
    pub ticks: u64,
    /// Mean acceleration in g.
    pub mean: AccelReading,
    /// Uniform per-axis jitter amplitude in g.
    pub jitter_g: f64,
    /// `None` while the receiver has no fix.
    pub gps_kmh: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RideProfile {
    segments: Vec<Segment>,
    total: u64,
}

impl RideProfile {
    /// `None` when the profile would have no ticks at all.
    pub fn new(segments: Vec<Segment>) -> Option<Self> {
        let total: u64 = segments.iter().map(|s| s.ticks).sum();
        (total > 0).then_some(Self { segments, total })
    }

    /// Rest, walk, scooter, bike, rest. Each segment spans a few seconds at 5 Hz.
    pub fn demo() -> Self {
        let segments = vec![
            Segment {
                label: "rest",
                ticks: 10,
                mean: AccelReading::new(0.0, 0.0, 1.0),
                jitter_g: 0.005,
                gps_kmh: Some(0.0),
            },
            Segment {
                label: "walk",
                ticks: 20,
                mean: AccelReading::new(0.7, 0.0, 1.0),
                jitter_g: 0.1,
                gps_kmh: Some(4.0),
            },
            Segment {
                label: "scooter",
                ticks: 25,
                mean: AccelReading::new(0.25, 0.03, 1.0),
                jitter_g: 0.04,
                gps_kmh: Some(15.0),
            },
            Segment {
                label: "bike",
                ticks: 25,
                mean: AccelReading::new(0.3, 0.28, 1.0),
                jitter_g: 0.04,
                gps_kmh: Some(18.0),
            },
            Segment {
                label: "stop",
                ticks: 15,
                mean: AccelReading::new(0.0, 0.0, 1.0),
                jitter_g: 0.005,
                gps_kmh: Some(0.0),
            },
        ];
        let total = segments.iter().map(|s| s.ticks).sum();
        Self { segments, total }
    }

    pub fn total_ticks(&self) -> u64 {
        self.total
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Segment active at `tick`, looping over the profile.
    pub fn at(&self, tick: u64) -> &Segment {
        let mut t = tick % self.total;
        for seg in &self.segments {
            if t < seg.ticks {
                return seg;
            }
            t -= seg.ticks;
        }
        // Unreachable while total > 0
        &self.segments[self.segments.len() - 1]
    }
}

impl Default for RideProfile {
    fn default() -> Self {
        Self::demo()
    }
}

/// Simulated accelerometer following a [`RideProfile`].
pub struct SimulatedImu {
    profile: RideProfile,
    rng: SmallRng,
    tick: u64,
    timeout_every: Option<u64>,
}

impl SimulatedImu {
    pub fn new(seed: u64) -> Self {
        Self::with_profile(RideProfile::demo(), seed)
    }

    pub fn with_profile(profile: RideProfile, seed: u64) -> Self {
        Self {
            profile,
            rng: SmallRng::seed_from_u64(seed),
            tick: 0,
            timeout_every: None,
        }
    }

    /// Fail every `n`th read with [`HwError::Timeout`]. `0` disables.
    pub fn with_timeouts(mut self, n: u64) -> Self {
        self.timeout_every = (n > 0).then_some(n);
        self
    }

    /// Reads attempted so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

impl Imu for SimulatedImu {
    fn read_accel(
        &mut self,
        _timeout: std::time::Duration,
    ) -> Result<AccelReading, Box<dyn std::error::Error + Send + Sync>> {
        let cur = self.tick;
        self.tick += 1;
        if let Some(n) = self.timeout_every {
            if (cur + 1) % n == 0 {
                tracing::trace!(tick = cur, "simulated imu timeout");
                return Err(Box::new(HwError::Timeout));
            }
        }
        let seg = self.profile.at(cur);
        let j = seg.jitter_g;
        Ok(AccelReading::new(
            self.rng.random_range(-1.0..1.0f64).mul_add(j, seg.mean.x),
            self.rng.random_range(-1.0..1.0f64).mul_add(j, seg.mean.y),
            self.rng.random_range(-1.0..1.0f64).mul_add(j, seg.mean.z),
        ))
    }
}

/// Simulated GPS receiver following a [`RideProfile`].
pub struct SimulatedGps {
    profile: RideProfile,
    tick: u64,
    tick_s: f64,
    outage: Option<Range<u64>>,
    lat_deg: f64,
    lon_deg: f64,
    satellites: u32,
}

impl SimulatedGps {
    /// `poll_hz` is how often `poll_fix` will be called; it scales the
    /// distance travelled per poll.
    pub fn new(poll_hz: u32) -> Self {
        Self::with_profile(RideProfile::demo(), poll_hz)
    }

    pub fn with_profile(profile: RideProfile, poll_hz: u32) -> Self {
        Self {
            profile,
            tick: 0,
            tick_s: 1.0 / f64::from(poll_hz.max(1)),
            outage: None,
            lat_deg: 48.858_370,
            lon_deg: 2.294_481,
            satellites: 9,
        }
    }

    /// Report no fix for `ticks` polls starting at poll number `start`.
    pub fn with_outage(mut self, start: u64, ticks: u64) -> Self {
        self.outage = (ticks > 0).then(|| start..start.saturating_add(ticks));
        self
    }
}

impl GpsSource for SimulatedGps {
    fn poll_fix(&mut self) -> Result<Option<GpsFix>, Box<dyn std::error::Error + Send + Sync>> {
        let cur = self.tick;
        self.tick += 1;
        if self.outage.as_ref().is_some_and(|r| r.contains(&cur)) {
            return Ok(None);
        }
        let Some(speed_kmh) = self.profile.at(cur).gps_kmh else {
            return Ok(None);
        };
        // Head due north
        self.lat_deg += speed_kmh / 3.6 * self.tick_s / METRES_PER_DEG;
        Ok(Some(GpsFix {
            speed_kmh,
            lat_deg: self.lat_deg,
            lon_deg: self.lon_deg,
            satellites: self.satellites,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn simulated_imu_is_deterministic_per_seed() {
        let mut a = SimulatedImu::new(7);
        let mut b = SimulatedImu::new(7);
        for _ in 0..50 {
            let ra = a.read_accel(Duration::from_millis(10)).unwrap();
            let rb = b.read_accel(Duration::from_millis(10)).unwrap();
            assert_eq!(ra, rb);
        }
    }

    #[test]
    fn jitter_stays_within_segment_band() {
        let mut imu = SimulatedImu::new(0);
        let rest = RideProfile::demo().at(0).clone();
        for _ in 0..rest.ticks {
            let r = imu.read_accel(Duration::from_millis(10)).unwrap();
            for (v, m) in [(r.x, rest.mean.x), (r.y, rest.mean.y), (r.z, rest.mean.z)] {
                assert!((v - m).abs() <= rest.jitter_g + 1e-12, "{v} outside {m}±{}", rest.jitter_g);
            }
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SimulatedImu::new(1);
        let mut b = SimulatedImu::new(2);
        let ra = a.read_accel(Duration::from_millis(10)).unwrap();
        let rb = b.read_accel(Duration::from_millis(10)).unwrap();
        assert_ne!(ra, rb);
    }

    #[test]
    fn profile_loops() {
        let p = RideProfile::demo();
        assert_eq!(p.at(0).label, "rest");
        assert_eq!(p.at(p.total_ticks()).label, "rest");
        assert_eq!(p.at(10).label, "walk");
    }

    #[test]
    fn empty_profile_rejected() {
        assert!(RideProfile::new(Vec::new()).is_none());
    }
}
