use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

// Minimal valid config; everything not listed falls back to defaults
fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[runner]
tick_hz = 10
gps_mode = "direct"
imu_timeout_ms = 50

[logging]
level = "warn"

[sim]
seed = 7
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["run", "--ticks", "5", "--fast"], 0, "\"mode\"", "stdout")]
#[case(&["classify", "--accel", "0.05", "--tilt", "0", "--gps", "0"], 0, "Stationary", "stdout")]
#[case(&["classify", "--accel", "1.0", "--tilt", "0", "--gps", "3"], 0, "Walking", "stdout")]
#[case(&["classify", "--accel", "0.3", "--tilt", "2", "--gps", "15"], 0, "Scooter", "stdout")]
#[case(&["classify", "--accel", "0.3", "--tilt", "-20", "--gps", "15"], 0, "Bike", "stdout")]
#[case(&["classify", "--accel", "0.3", "--tilt", "0", "--gps", "30"], 0, "Bike", "stdout")]
#[case(&["classify", "--accel", "0.3", "--tilt", "0", "--inertial-speed", "4"], 0, "Scooter", "stdout")]
#[case(&["classify", "--accel", "0.3", "--tilt", "0"], 0, "Unknown", "stdout")]
#[case(&["classify", "--accel", "0.3", "--tilt", "0", "--gps", "-1"], 1, "--gps", "stderr")]
#[case(&["classify", "--tilt", "0"], 2, "required", "stderr")]
#[case(&["self-check"], 0, "OK", "stdout")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("ride_cli").unwrap();

    // Always include a valid config to avoid relying on defaults
    cmd.arg("--config").arg(&cfg);
    for a in args {
        cmd.arg(a);
    }

    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[rstest]
fn classify_json_output() {
    let mut cmd = Command::cargo_bin("ride_cli").unwrap();
    let out = cmd
        .args(["--json", "classify", "--accel", "1.2", "--tilt", "0", "--gps", "4"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["mode"], "Walking");
}

#[rstest]
fn fallback_can_be_disabled_in_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cfg.toml");
    fs::write(&path, "[mode]\ninertial_fallback = false\n").unwrap();

    Command::cargo_bin("ride_cli")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .args(["classify", "--accel", "1.0", "--tilt", "0", "--inertial-speed", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown"));
}

#[rstest]
#[case("[runner]\ntick_hz = 0\n", "runner.tick_hz")]
#[case("[mounting]\nlateral_axis = \"z\"\nvertical_axis = \"z\"\n", "mounting.lateral_axis")]
#[case("[speed]\nalpha = 1.0\n", "speed.alpha")]
#[case("[runner\n", "parse config")]
fn cli_rejects_bad_config(#[case] toml: &str, #[case] needle: &str) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, toml).unwrap();

    Command::cargo_bin("ride_cli")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .args(["run", "--ticks", "1", "--fast"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(needle));
}

#[rstest]
fn cli_reports_missing_config_file() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("ride_cli")
        .unwrap()
        .arg("--config")
        .arg(dir.path().join("nope.toml"))
        .arg("self-check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("read config"));
}

#[rstest]
fn cli_reports_bad_trace_header() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let bad_csv = dir.path().join("trace.csv");
    let mut f = fs::File::create(&bad_csv).unwrap();
    writeln!(f, "time,x,y,z,speed").unwrap();
    writeln!(f, "0,0.0,0.0,1.0,").unwrap();

    Command::cargo_bin("ride_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("replay")
        .arg("--trace")
        .arg(&bad_csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid headers"));
}

#[rstest]
fn cli_reports_out_of_order_trace_as_json() {
    let dir = tempdir().unwrap();
    let csv = dir.path().join("trace.csv");
    fs::write(
        &csv,
        "t_ms,ax,ay,az,gps_kmh\n400,0.0,0.0,1.0,\n200,0.0,0.0,1.0,\n",
    )
    .unwrap();

    let out = Command::cargo_bin("ride_cli")
        .unwrap()
        .args(["--json", "--log-level", "off", "replay", "--trace"])
        .arg(&csv)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8(out.stderr).unwrap();
    let last = stderr.lines().last().unwrap();
    let v: serde_json::Value = serde_json::from_str(last).unwrap();
    assert_eq!(v["reason"], "Error");
    assert!(v["message"].as_str().unwrap().contains("non-decreasing"));
}
