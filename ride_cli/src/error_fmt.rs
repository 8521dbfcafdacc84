//! Error formatting and exit code mapping for the CLI.

use std::error::Error as _;

use ride_core::error::{BuildError, FusionError};

/// Convert an error into a concise, human-friendly message.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingImu => {
                "What happened: No accelerometer was provided to the fusion context.\nLikely causes: The IMU failed to initialize or was not wired into the builder.\nHow to fix: Ensure the IMU is created successfully and passed via with_imu(...).".to_string()
            }
            BuildError::MissingGps => {
                "What happened: No GPS source was provided to the fusion context.\nLikely causes: The receiver failed to initialize or was not wired into the builder.\nHow to fix: Pass a source via with_gps(...), or run with --no-gps.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/ride_config.toml for a sample."
            ),
        };
    }

    if let Some(fe) = err.downcast_ref::<FusionError>() {
        return match fe {
            FusionError::Timeout => "What happened: Accelerometer read timed out.\nLikely causes: Sensor not wired correctly, no power, or timeout too low.\nHow to fix: Verify the bus wiring and consider increasing runner.imu_timeout_ms in the config.".to_string(),
            FusionError::Stalled(ms) => format!(
                "What happened: The accelerometer produced no sample for {ms} ms and the run was stopped.\nLikely causes: Sensor disconnected or bus locked up.\nHow to fix: Check the sensor connection, then start a new run."
            ),
            FusionError::HardwareFault(msg) => format!(
                "What happened: Sensor hardware fault ({msg}).\nLikely causes: Bus error or a damaged sensor.\nHow to fix: Power-cycle the sensor and check wiring before retrying."
            ),
            FusionError::InvalidSample { axis, value } => format!(
                "What happened: The accelerometer reported {value} on the {axis} axis.\nLikely causes: Corrupted read or a sensor in a fault state.\nHow to fix: Re-run with --log-level=debug and check the raw readings."
            ),
            // Fallback to generic for other domain errors
            FusionError::Hardware(_) => format!(
                "What happened: {fe}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    // String-based heuristics for errors coming from config or trace loading
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("trace csv must have headers") {
        return "Invalid headers in trace CSV. Expected 't_ms,ax,ay,az,gps_kmh'.".to_string();
    }

    if lower.starts_with("trace") || lower.contains("trace csv") || lower.contains("csv row") {
        return format!(
            "What happened: The trace could not be replayed ({msg}).\nLikely causes: A truncated recording or rows out of order.\nHow to fix: Fix the CSV and try again."
        );
    }

    if lower.contains("parse config") || lower.contains("read config") || is_config_key(&lower) {
        return format!(
            "What happened: Configuration is invalid or incomplete ({msg}).\nLikely causes: A typo in a key or an out-of-range value.\nHow to fix: Edit the TOML config and try again."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Validation messages from `ride_config` start with the offending section.
fn is_config_key(lower: &str) -> bool {
    [
        "mounting.", "motion.", "speed.", "posture.", "mode.", "runner.", "logging.", "sim.",
    ]
    .iter()
    .any(|p| lower.starts_with(p))
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(fe) = err.downcast_ref::<FusionError>() {
        return match fe {
            FusionError::Timeout => "Timeout",
            FusionError::Stalled(_) => "Stalled",
            FusionError::HardwareFault(_) => "HardwareFault",
            FusionError::Hardware(_) => "Hardware",
            FusionError::InvalidSample { .. } => "InvalidSample",
        };
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return "Config";
    }
    "Error"
}

/// Stable exit codes for fusion failures; everything else returns 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if let Some(fe) = err.downcast_ref::<FusionError>() {
        return match fe {
            FusionError::Stalled(_) => 3,
            FusionError::Timeout => 4,
            FusionError::HardwareFault(_) | FusionError::Hardware(_) => 5,
            FusionError::InvalidSample { .. } => 6,
        };
    }
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let msg = humanize(err);
    match err.downcast_ref::<FusionError>() {
        Some(FusionError::Stalled(ms)) => {
            json!({ "reason": "Stalled", "details": { "stalled_ms": ms }, "message": msg })
                .to_string()
        }
        _ => json!({ "reason": reason_name(err), "message": msg }).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stalled_maps_to_code_and_details() {
        let err = eyre::Report::new(FusionError::Stalled(450));
        assert_eq!(exit_code_for_error(&err), 3);
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "Stalled");
        assert_eq!(v["details"]["stalled_ms"], 450);
    }

    #[test]
    fn config_validation_messages_are_recognized() {
        let err = eyre::eyre!("runner.tick_hz must be > 0");
        assert!(humanize(&err).contains("Configuration is invalid"));
        assert_eq!(exit_code_for_error(&err), 1);
    }

    #[test]
    fn trace_header_special_case() {
        let err = eyre::eyre!("trace CSV must have headers 't_ms,ax,ay,az,gps_kmh', got: a,b");
        assert_eq!(
            humanize(&err),
            "Invalid headers in trace CSV. Expected 't_ms,ax,ay,az,gps_kmh'."
        );
    }

    #[test]
    fn build_errors_report_as_config() {
        let err = eyre::Report::new(BuildError::MissingGps);
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "Config");
        assert!(v["message"].as_str().unwrap().contains("--no-gps"));
    }
}
