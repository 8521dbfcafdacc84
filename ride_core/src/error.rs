use thiserror::Error;

use crate::types::Axis;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FusionError {
    /// Sample rejected before it could touch motion state.
    #[error("invalid sample: {axis} axis is {value}")]
    InvalidSample { axis: Axis, value: f64 },
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("hardware fault: {0}")]
    HardwareFault(String),
    #[error("timeout waiting for sensor")]
    Timeout,
    #[error("imu stalled for {0} ms")]
    Stalled(u64),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("missing imu")]
    MissingImu,
    #[error("missing gps source")]
    MissingGps,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
