#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Ride fusion core (hardware-agnostic).
//!
//! Fuses accelerometer samples and an optional GPS speed into a per-tick
//! estimate of whether the rider is moving, how they are leaning, how fast
//! they are going, and which travel mode they are in. All sensor access goes
//! through `ride_traits::Imu` and `ride_traits::GpsSource`.
//!
//! ## Architecture
//!
//! - **Preprocessing**: tilt, gravity compensation, noise floor (`preprocess`)
//! - **Debounce**: moving/stopped with a stop-timeout hold (`debounce`)
//! - **Speed**: gain plus exponential low-pass (`speed`)
//! - **Classification**: ordered mode rules (`classify`)
//! - **Orchestration**: `FusionCore::tick` / `FusionCore::step` (`fusion`)
//! - **Delivery**: non-blocking fan-out and telemetry records (`publish`, `telemetry`)
//! - **Scheduling**: fixed-period loop and trace replay (`runner`), GPS thread (`sampler`)
//!
//! Timestamps are milliseconds on a monotonic counter; intervals use
//! wrapping subtraction.

pub mod builder;
pub mod classify;
pub mod config;
pub mod context;
pub mod conversions;
pub mod debounce;
pub mod error;
pub mod fusion;
pub mod hw_error;
pub mod mocks;
pub mod preprocess;
pub mod publish;
pub mod runner;
pub mod sampler;
pub mod speed;
pub mod telemetry;
pub mod types;
pub mod util;

pub use builder::SensorContextBuilder;
pub use classify::{ModeSignals, classify};
pub use config::{FusionParams, ModeCfg, MotionCfg, MountingCfg, PostureCfg, RunnerCfg, SpeedCfg};
pub use context::{GpsFeed, SensorContext};
pub use error::{BuildError, FusionError, Result};
pub use fusion::FusionCore;
pub use publish::EstimatePublisher;
pub use runner::{RunParams, RunSummary, replay, run};
pub use sampler::GpsSampler;
pub use telemetry::TelemetryRecord;
pub use types::{AccelSample, Axis, FusionEstimate, ModeLabel, MotionState, Posture, Published};
