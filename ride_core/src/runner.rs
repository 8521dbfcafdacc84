//! Fixed-period scheduler around the fusion core.
//!
//! The core itself never sleeps or does I/O. `run` owns the cadence: read
//! sensors via the context, tick, publish, sleep out the rest of the period.
//! `replay` drives the same core from a recorded trace with no clock at all.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use ride_config::TraceRow;

use crate::context::SensorContext;
use crate::error::{FusionError, Result as CoreResult};
use crate::fusion::FusionCore;
use crate::publish::EstimatePublisher;
use crate::types::{AccelSample, Published};
use crate::util::elapsed_ms;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunParams {
    pub tick_hz: u32,
    /// Stop after this many ticks; `None` runs until shutdown.
    pub max_ticks: Option<u64>,
    /// Per-read IMU timeout, feeds the stall threshold.
    pub imu_timeout_ms: u64,
}

impl From<&crate::config::RunnerCfg> for RunParams {
    fn from(c: &crate::config::RunnerCfg) -> Self {
        Self {
            tick_hz: c.tick_hz,
            max_ticks: None,
            imu_timeout_ms: c.imu_timeout_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Ticks that produced an estimate.
    pub ticks: u64,
    /// Ticks skipped on a transient IMU error or rejected sample.
    pub skipped: u64,
    /// Subscriber deliveries lost to full queues.
    pub dropped: u64,
}

/// How long the IMU may fail before the run is aborted as stalled.
///
/// At least four read timeouts, and never less than two periods so one
/// missed sample cannot trip it.
#[inline]
fn stall_threshold_ms(imu_timeout_ms: u64, period_ms: u64) -> u64 {
    imu_timeout_ms
        .saturating_mul(4)
        .max(period_ms.saturating_mul(2))
        .max(1)
}

/// Tick until `max_ticks` is reached or `shutdown` is raised.
///
/// Transient IMU errors skip the tick. A persistent one aborts with
/// [`FusionError::Stalled`]; a hardware fault aborts immediately.
pub fn run(
    core: &mut FusionCore,
    ctx: &mut SensorContext,
    publisher: &mut EstimatePublisher,
    params: &RunParams,
    shutdown: &AtomicBool,
) -> CoreResult<RunSummary> {
    let period_ms = crate::util::period_ms(params.tick_hz);
    let period = Duration::from_millis(period_ms);
    let stall_ms = stall_threshold_ms(params.imu_timeout_ms, period_ms);
    let mut summary = RunSummary::default();
    let mut last_ok_ms = ctx.now_ms();

    tracing::info!(
        hz = params.tick_hz,
        max_ticks = ?params.max_ticks,
        gps = ctx.gps_mode(),
        stall_ms,
        "run start"
    );

    loop {
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!("shutdown requested");
            break;
        }
        if params
            .max_ticks
            .is_some_and(|max| summary.ticks + summary.skipped >= max)
        {
            break;
        }

        let started = ctx.now_ms();
        match core.step(ctx) {
            Ok(p) => {
                summary.ticks += 1;
                last_ok_ms = p.estimate.timestamp_ms;
                publisher.publish(p);
            }
            Err(e @ FusionError::HardwareFault(_)) => {
                tracing::error!(error = %e, "run aborted");
                return Err(crate::error::Report::new(e));
            }
            Err(e) => {
                summary.skipped += 1;
                let stalled = elapsed_ms(ctx.now_ms(), last_ok_ms);
                tracing::warn!(error = %e, stalled_ms = stalled, "tick skipped");
                if stalled > stall_ms {
                    tracing::error!(stalled_ms = stalled, "imu stalled, run aborted");
                    return Err(crate::error::Report::new(FusionError::Stalled(stalled)));
                }
            }
        }

        let spent = elapsed_ms(ctx.now_ms(), started);
        ctx.sleep(period.saturating_sub(Duration::from_millis(spent)));
    }

    summary.dropped = publisher.dropped();
    tracing::info!(
        ticks = summary.ticks,
        skipped = summary.skipped,
        dropped = summary.dropped,
        "run complete"
    );
    Ok(summary)
}

/// Feed a recorded trace through `core`, handing each estimate to `sink`.
///
/// Rows with a non-finite axis are skipped and counted, as in `run`.
pub fn replay<F>(core: &mut FusionCore, rows: &[TraceRow], mut sink: F) -> RunSummary
where
    F: FnMut(Published),
{
    let mut summary = RunSummary::default();
    tracing::info!(rows = rows.len(), "replay start");
    for row in rows {
        let sample = AccelSample::new(row.ax, row.ay, row.az, row.t_ms);
        match core.tick(sample, row.gps_kmh, row.t_ms) {
            Ok(estimate) => {
                summary.ticks += 1;
                sink(Published {
                    estimate,
                    fix: None,
                });
            }
            Err(e) => {
                summary.skipped += 1;
                tracing::warn!(error = %e, t_ms = row.t_ms, "trace row skipped");
            }
        }
    }
    tracing::info!(ticks = summary.ticks, skipped = summary.skipped, "replay complete");
    summary
}
