//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "ride", version, about = "Ride motion fusion CLI")]
pub struct Cli {
    /// Path to config TOML; built-in defaults when omitted
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log as JSON lines and report errors as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Log level (error|warn|info|debug|trace); falls back to logging.level, then info
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the fusion loop on the simulated sensors, one telemetry line per tick
    Run {
        /// Stop after this many ticks (runs until Ctrl-C when omitted)
        #[arg(long, value_name = "N")]
        ticks: Option<u64>,
        /// Override runner.tick_hz
        #[arg(long, value_name = "HZ")]
        hz: Option<u32>,
        /// Run without a GPS receiver
        #[arg(long = "no-gps", action = ArgAction::SetTrue)]
        no_gps: bool,
        /// Poll GPS inline instead of from a sampler thread
        #[arg(long, action = ArgAction::SetTrue)]
        direct: bool,
        /// Run as fast as possible on a simulated clock
        #[arg(long, action = ArgAction::SetTrue)]
        fast: bool,
    },
    /// Feed a recorded trace CSV (t_ms,ax,ay,az,gps_kmh) through the core
    Replay {
        #[arg(long, value_name = "FILE")]
        trace: PathBuf,
    },
    /// Classify one set of signals and print the mode
    Classify {
        /// Linear acceleration after gravity removal (g)
        #[arg(long, value_name = "G", allow_negative_numbers = true)]
        accel: f64,
        /// Tilt in degrees
        #[arg(long, value_name = "DEG", allow_negative_numbers = true)]
        tilt: f64,
        /// GPS speed in km/h; omit for no fix
        #[arg(long, value_name = "KMH", allow_negative_numbers = true)]
        gps: Option<f64>,
        /// Smoothed inertial speed estimate
        #[arg(long = "inertial-speed", value_name = "V", default_value_t = 0.0)]
        inertial_speed: f64,
    },
    /// Quick health check (sensor presence / sim ok)
    SelfCheck,
}
