//! Type-state builder for `SensorContext`.
//!
//! `build()` only exists once both an IMU and a GPS feed were provided;
//! `try_build()` is always available and reports what is missing.

use std::marker::PhantomData;
use std::time::Duration;

use ride_traits::clock::{Clock, MonotonicClock};
use ride_traits::{GpsSource, Imu};

use crate::context::{GpsFeed, SensorContext};
use crate::error::{BuildError, Result};
use crate::sampler::GpsSampler;

pub struct Missing;
pub struct Set;

pub struct SensorContextBuilder<I, G> {
    imu: Option<Box<dyn Imu + Send>>,
    gps: Option<GpsFeed>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    imu_timeout: Option<Duration>,
    _i: PhantomData<I>,
    _g: PhantomData<G>,
}

impl Default for SensorContextBuilder<Missing, Missing> {
    fn default() -> Self {
        Self {
            imu: None,
            gps: None,
            clock: None,
            imu_timeout: None,
            _i: PhantomData,
            _g: PhantomData,
        }
    }
}

impl<I, G> SensorContextBuilder<I, G> {
    /// Fallible build available in any type-state.
    pub fn try_build(self) -> Result<SensorContext> {
        let imu = self
            .imu
            .ok_or_else(|| eyre::Report::new(BuildError::MissingImu))?;
        let gps = self
            .gps
            .ok_or_else(|| eyre::Report::new(BuildError::MissingGps))?;
        let imu_timeout = self.imu_timeout.unwrap_or(Duration::from_millis(50));
        if imu_timeout.is_zero() {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "imu timeout must be >= 1 ms",
            )));
        }
        let clock: Box<dyn Clock + Send + Sync> = match self.clock {
            Some(c) => c,
            None => Box::new(MonotonicClock::new()),
        };
        let epoch = clock.now();
        tracing::debug!(gps = gps.mode_name(), ?imu_timeout, "sensor context built");
        Ok(SensorContext {
            imu,
            gps,
            clock,
            epoch,
            imu_timeout,
        })
    }

    /// Provide a custom clock; defaults to `MonotonicClock`.
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_imu_timeout(mut self, timeout: Duration) -> Self {
        self.imu_timeout = Some(timeout);
        self
    }
}

impl<G> SensorContextBuilder<Missing, G> {
    pub fn with_imu(self, imu: impl Imu + Send + 'static) -> SensorContextBuilder<Set, G> {
        SensorContextBuilder {
            imu: Some(Box::new(imu)),
            gps: self.gps,
            clock: self.clock,
            imu_timeout: self.imu_timeout,
            _i: PhantomData,
            _g: PhantomData,
        }
    }
}

impl<I> SensorContextBuilder<I, Missing> {
    /// Poll `gps` inline on every tick.
    pub fn with_gps(self, gps: impl GpsSource + Send + 'static) -> SensorContextBuilder<I, Set> {
        self.with_gps_feed(GpsFeed::Direct(Box::new(gps)))
    }

    /// Read fixes from an already running sampler thread.
    pub fn with_gps_sampler(self, sampler: GpsSampler) -> SensorContextBuilder<I, Set> {
        self.with_gps_feed(GpsFeed::Sampler(sampler))
    }

    pub fn with_gps_feed(self, feed: GpsFeed) -> SensorContextBuilder<I, Set> {
        SensorContextBuilder {
            imu: self.imu,
            gps: Some(feed),
            clock: self.clock,
            imu_timeout: self.imu_timeout,
            _i: PhantomData,
            _g: PhantomData,
        }
    }
}

impl SensorContextBuilder<Set, Set> {
    /// Validate and build. Only available once IMU and GPS are set.
    pub fn build(self) -> Result<SensorContext> {
        self.try_build()
    }
}
