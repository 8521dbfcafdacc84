pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

/// One accelerometer reading in g, as delivered by the IMU driver.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AccelReading {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AccelReading {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A valid position/speed solution from the GPS decoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsFix {
    pub speed_kmh: f64,
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub satellites: u32,
}

pub trait Imu {
    fn read_accel(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<AccelReading, Box<dyn std::error::Error + Send + Sync>>;
}

pub trait GpsSource {
    /// Latest decoded fix; `Ok(None)` while the receiver has no valid fix.
    fn poll_fix(&mut self) -> Result<Option<GpsFix>, Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: Imu + ?Sized> Imu for Box<T> {
    fn read_accel(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<AccelReading, Box<dyn std::error::Error + Send + Sync>> {
        (**self).read_accel(timeout)
    }
}

impl<T: GpsSource + ?Sized> GpsSource for Box<T> {
    fn poll_fix(&mut self) -> Result<Option<GpsFix>, Box<dyn std::error::Error + Send + Sync>> {
        (**self).poll_fix()
    }
}
