//! Command implementations: sensor assembly, the run loop, replay and
//! one-shot classification.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use ride_config::{Config, GpsMode};
use ride_core::error::Result as CoreResult;
use ride_core::mocks::NoGps;
use ride_core::{
    EstimatePublisher, FusionCore, FusionParams, GpsFeed, GpsSampler, ModeSignals, Published,
    RunParams, RunSummary, RunnerCfg, SensorContext, TelemetryRecord, classify,
};
use ride_hardware::{SimulatedGps, SimulatedImu};
use ride_traits::GpsSource;
use ride_traits::clock::{Clock, ManualClock, MonotonicClock};

/// Options of the `run` command after merging CLI flags over config.
#[derive(Debug, Clone, Copy)]
pub struct RunOpts {
    pub ticks: Option<u64>,
    pub hz: Option<u32>,
    pub no_gps: bool,
    pub direct: bool,
    pub fast: bool,
}

fn build_core(cfg: &Config) -> CoreResult<FusionCore> {
    let params = FusionParams::from(cfg);
    FusionCore::new(params).map_err(eyre::Report::new)
}

fn simulated_gps(cfg: &Config, hz: u32, no_gps: bool) -> Box<dyn GpsSource + Send> {
    if no_gps {
        return Box::new(NoGps);
    }
    let gps = SimulatedGps::new(hz);
    match cfg.sim.gps_outage_start {
        Some(start) => Box::new(gps.with_outage(start, cfg.sim.gps_outage_ticks)),
        None => Box::new(gps),
    }
}

/// Print one JSON telemetry line per published estimate until the publisher
/// goes away.
fn spawn_transport(
    rx: impl IntoIterator<Item = Published> + Send + 'static,
) -> std::thread::JoinHandle<u64> {
    std::thread::spawn(move || {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let mut lines = 0u64;
        for p in rx {
            let rec = TelemetryRecord::from(&p);
            let line = match serde_json::to_string(&rec) {
                Ok(l) => l,
                Err(e) => {
                    tracing::warn!(error = %e, "telemetry serialization failed");
                    continue;
                }
            };
            if writeln!(out, "{line}").and_then(|()| out.flush()).is_err() {
                tracing::debug!("stdout closed, transport exiting");
                break;
            }
            lines += 1;
        }
        lines
    })
}

pub fn run_sim(cfg: &Config, opts: RunOpts, shutdown: Arc<AtomicBool>) -> CoreResult<RunSummary> {
    let mut core = build_core(cfg)?;
    let mut runner_cfg = RunnerCfg::from(&cfg.runner);
    if let Some(hz) = opts.hz {
        if hz == 0 {
            eyre::bail!("--hz must be > 0");
        }
        runner_cfg.tick_hz = hz;
    }

    let imu = SimulatedImu::new(u64::from(cfg.sim.seed));
    let gps = simulated_gps(cfg, runner_cfg.tick_hz, opts.no_gps);
    // The simulated clock only moves when the tick loop sleeps, so a sampler
    // thread could not share it
    let direct = opts.direct || opts.fast || cfg.runner.gps_mode == GpsMode::Direct;
    let feed = if direct {
        GpsFeed::Direct(gps)
    } else {
        GpsFeed::Sampler(GpsSampler::spawn(
            gps,
            runner_cfg.tick_hz,
            runner_cfg.gps_stale_ms,
            MonotonicClock::new(),
        ))
    };
    let clock: Box<dyn Clock + Send + Sync> = if opts.fast {
        Box::new(ManualClock::new())
    } else {
        Box::new(MonotonicClock::new())
    };
    let mut ctx = SensorContext::builder()
        .with_imu(imu)
        .with_gps_feed(feed)
        .with_clock(clock)
        .with_imu_timeout(Duration::from_millis(runner_cfg.imu_timeout_ms))
        .build()?;

    // A fast run never waits for the transport, so size its queue for the whole run
    let capacity = match (opts.fast, opts.ticks) {
        (true, Some(n)) => runner_cfg
            .channel_capacity
            .max(usize::try_from(n).unwrap_or(usize::MAX)),
        _ => runner_cfg.channel_capacity,
    };
    let mut publisher = EstimatePublisher::new();
    let transport = spawn_transport(publisher.subscribe(capacity));

    let params = RunParams {
        max_ticks: opts.ticks,
        ..RunParams::from(&runner_cfg)
    };
    let result = ride_core::run(&mut core, &mut ctx, &mut publisher, &params, &shutdown);

    // Dropping the publisher closes the channel and lets the transport drain out
    drop(publisher);
    match transport.join() {
        Ok(lines) => tracing::debug!(lines, "transport finished"),
        Err(e) => tracing::warn!(?e, "transport thread panicked"),
    }
    result
}

pub fn replay_trace(cfg: &Config, path: &Path) -> CoreResult<RunSummary> {
    let rows = ride_config::load_trace_csv(path)?;
    let mut core = build_core(cfg)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut write_err = None;
    let summary = ride_core::replay(&mut core, &rows, |p| {
        if write_err.is_some() {
            return;
        }
        let rec = TelemetryRecord::from(&p);
        let res = serde_json::to_string(&rec)
            .map_err(eyre::Report::new)
            .and_then(|line| writeln!(out, "{line}").map_err(eyre::Report::new));
        if let Err(e) = res {
            write_err = Some(e);
        }
    });
    if let Some(e) = write_err {
        return Err(e);
    }
    Ok(summary)
}

pub fn classify_once(
    cfg: &Config,
    accel: f64,
    tilt: f64,
    gps: Option<f64>,
    inertial_speed: f64,
) -> CoreResult<ride_core::ModeLabel> {
    if !(accel.is_finite() && accel >= 0.0) {
        eyre::bail!("--accel must be a finite value >= 0");
    }
    if !tilt.is_finite() || tilt.abs() >= 90.0 {
        eyre::bail!("--tilt must be within (-90, 90) degrees");
    }
    if gps.is_some_and(|v| !(v.is_finite() && v >= 0.0)) {
        eyre::bail!("--gps must be a finite value >= 0");
    }
    if !(inertial_speed.is_finite() && inertial_speed >= 0.0) {
        eyre::bail!("--inertial-speed must be a finite value >= 0");
    }
    let params = FusionParams::from(cfg);
    Ok(classify(
        &params.mode,
        &ModeSignals {
            gps_speed_kmh: gps,
            tilt_deg: tilt,
            accel_g: accel,
            inertial_speed,
        },
    ))
}

/// Build the simulated sensors and read each once.
pub fn self_check(cfg: &Config) -> CoreResult<String> {
    let runner_cfg = RunnerCfg::from(&cfg.runner);
    let mut ctx = SensorContext::builder()
        .with_imu(SimulatedImu::new(u64::from(cfg.sim.seed)))
        .with_gps(SimulatedGps::new(runner_cfg.tick_hz))
        .with_imu_timeout(Duration::from_millis(runner_cfg.imu_timeout_ms))
        .build()?;
    let sample = ctx.read_accel().map_err(eyre::Report::new)?;
    let fix = ctx.read_fix().map_err(eyre::Report::new)?;
    tracing::info!(?sample, ?fix, "self-check read");
    Ok(format!(
        "OK imu=({:.2},{:.2},{:.2}) gps={}",
        sample.x,
        sample.y,
        sample.z,
        if fix.is_some() { "fix" } else { "no-fix" }
    ))
}
