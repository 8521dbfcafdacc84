#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod cli;
mod commands;
mod error_fmt;
mod logging;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::WrapErr;

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::commands::RunOpts;
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn load_config(path: Option<&Path>) -> eyre::Result<ride_config::Config> {
    let cfg = match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .wrap_err_with(|| format!("read config {}", p.display()))?;
            ride_config::load_toml(&text)
                .map_err(|e| eyre::eyre!("parse config {}: {e}", p.display()))?
        }
        None => ride_config::Config::default(),
    };
    cfg.validate()?;
    Ok(cfg)
}

fn report(err: &eyre::Report) -> i32 {
    if JSON_MODE.get().copied().unwrap_or(false) {
        eprintln!("{}", format_error_json(err));
    } else {
        eprintln!("{}", humanize(err));
    }
    exit_code_for_error(err)
}

fn dispatch(cli: &Cli, cfg: &ride_config::Config, shutdown: Arc<AtomicBool>) -> eyre::Result<()> {
    match &cli.cmd {
        Commands::Run {
            ticks,
            hz,
            no_gps,
            direct,
            fast,
        } => {
            let opts = RunOpts {
                ticks: *ticks,
                hz: *hz,
                no_gps: *no_gps,
                direct: *direct,
                fast: *fast,
            };
            let summary = commands::run_sim(cfg, opts, shutdown)?;
            if summary.dropped > 0 {
                tracing::warn!(dropped = summary.dropped, "telemetry lines were dropped");
            }
        }
        Commands::Replay { trace } => {
            let summary = commands::replay_trace(cfg, trace)?;
            if summary.skipped > 0 {
                tracing::warn!(skipped = summary.skipped, "trace rows were skipped");
            }
        }
        Commands::Classify {
            accel,
            tilt,
            gps,
            inertial_speed,
        } => {
            let mode = commands::classify_once(cfg, *accel, *tilt, *gps, *inertial_speed)?;
            if cli.json {
                println!("{}", serde_json::json!({ "mode": mode.as_str() }));
            } else {
                println!("{}", mode.as_str());
            }
        }
        Commands::SelfCheck => {
            println!("{}", commands::self_check(cfg)?);
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(e) = color_eyre::install() {
        eprintln!("failed to install error handler: {e}");
    }

    let cfg = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => std::process::exit(report(&e)),
    };

    if let Err(e) = logging::init_tracing(cli.json, cli.log_level.as_deref(), &cfg.logging) {
        eprintln!("{e}");
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = shutdown.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
        }) {
            tracing::warn!(error = %e, "could not install Ctrl-C handler");
        }
    }

    if let Err(e) = dispatch(&cli, &cfg, shutdown) {
        tracing::error!(error = %e, "command failed");
        std::process::exit(report(&e));
    }
}
