//! Sensor context owned by the caller and lent to the core each tick.
//!
//! Holds the IMU, the GPS feed and the clock; there is no global sensor
//! state anywhere in the crate.

use std::time::{Duration, Instant};

use ride_traits::clock::Clock;
use ride_traits::{GpsFix, GpsSource, Imu};

use crate::builder::{Missing, SensorContextBuilder};
use crate::error::FusionError;
use crate::hw_error::map_hw_error;
use crate::sampler::GpsSampler;
use crate::types::AccelSample;

/// Where the tick loop gets its GPS fix from.
pub enum GpsFeed {
    /// Poll the decoder inline on every tick.
    Direct(Box<dyn GpsSource + Send>),
    /// Take the latest fix published by a background sampler thread.
    Sampler(GpsSampler),
}

impl GpsFeed {
    pub fn fix(&mut self) -> Result<Option<GpsFix>, FusionError> {
        match self {
            GpsFeed::Direct(src) => src.poll_fix().map_err(|e| map_hw_error(&*e)),
            GpsFeed::Sampler(s) => Ok(s.latest()),
        }
    }

    pub fn mode_name(&self) -> &'static str {
        match self {
            GpsFeed::Direct(_) => "direct",
            GpsFeed::Sampler(_) => "sampler",
        }
    }
}

pub struct SensorContext {
    pub(crate) imu: Box<dyn Imu + Send>,
    pub(crate) gps: GpsFeed,
    pub(crate) clock: Box<dyn Clock + Send + Sync>,
    pub(crate) epoch: Instant,
    pub(crate) imu_timeout: Duration,
}

impl core::fmt::Debug for SensorContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SensorContext")
            .field("gps", &self.gps.mode_name())
            .field("imu_timeout", &self.imu_timeout)
            .finish_non_exhaustive()
    }
}

impl SensorContext {
    pub fn builder() -> SensorContextBuilder<Missing, Missing> {
        SensorContextBuilder::default()
    }

    /// Milliseconds since this context was built, on its own clock.
    pub fn now_ms(&self) -> u64 {
        self.clock.ms_since(self.epoch)
    }

    pub fn sleep(&self, d: Duration) {
        self.clock.sleep(d);
    }

    /// Read one sample, stamped with the context clock.
    pub fn read_accel(&mut self) -> Result<AccelSample, FusionError> {
        let ts = self.now_ms();
        self.imu
            .read_accel(self.imu_timeout)
            .map(|r| AccelSample::from_reading(r, ts))
            .map_err(|e| map_hw_error(&*e))
    }

    pub fn read_fix(&mut self) -> Result<Option<GpsFix>, FusionError> {
        self.gps.fix()
    }

    pub fn gps_mode(&self) -> &'static str {
        self.gps.mode_name()
    }
}
