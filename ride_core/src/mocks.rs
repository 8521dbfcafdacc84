//! Test and helper collaborators for ride_core

use ride_traits::{AccelReading, GpsFix, GpsSource, Imu};

/// A GPS source that never has a fix; used when running without a receiver.
pub struct NoGps;

impl GpsSource for NoGps {
    fn poll_fix(&mut self) -> Result<Option<GpsFix>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(None)
    }
}

/// An IMU that returns the same reading forever.
pub struct FixedImu(pub AccelReading);

impl Imu for FixedImu {
    fn read_accel(
        &mut self,
        _timeout: std::time::Duration,
    ) -> Result<AccelReading, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.0)
    }
}

/// A GPS source that always reports the same fix.
pub struct FixedGps(pub GpsFix);

impl GpsSource for FixedGps {
    fn poll_fix(&mut self) -> Result<Option<GpsFix>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Some(self.0))
    }
}
