//! Tracing subscriber setup. Logs go to stderr so stdout stays telemetry only.

use std::path::Path;

use eyre::WrapErr;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::FILE_GUARD;

/// `RUST_LOG` wins over `--log-level`, which wins over `logging.level`.
fn env_filter(cli_level: Option<&str>, cfg_level: Option<&str>) -> EnvFilter {
    let level = cli_level.or(cfg_level).unwrap_or("info");
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn file_appender(path: &Path, rotation: Option<&str>) -> rolling::RollingFileAppender {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .map_or_else(|| "ride.log".into(), |n| n.to_string_lossy().into_owned());
    match rotation {
        Some("daily") => rolling::daily(dir, name),
        Some("hourly") => rolling::hourly(dir, name),
        _ => rolling::never(dir, name),
    }
}

pub fn init_tracing(
    json: bool,
    cli_level: Option<&str>,
    logging: &ride_config::Logging,
) -> eyre::Result<()> {
    let filter = env_filter(cli_level, logging.level.as_deref());

    let console = if json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let file = logging.file.as_deref().map(|f| {
        let appender = file_appender(Path::new(f), logging.rotation.as_deref());
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        fmt::layer().json().with_ansi(false).with_writer(writer).boxed()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .wrap_err("failed to initialize tracing subscriber")
}
