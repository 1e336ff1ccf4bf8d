use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

const HEADER: &str = "time_s,cpu_%,mem_MB,gpu_power_W,gpu_mem_MB";

fn monitor(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_program-monitor"))
        .args(args)
        .current_dir(dir)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run program-monitor")
}

#[test]
fn test_no_command_exits_with_usage() {
    let dir = tempfile::tempdir().unwrap();

    let output = monitor(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "stderr: {stderr}");
    assert!(!dir.path().join("monitor_stats.csv").exists());
    assert!(!dir.path().join("monitor_usage.png").exists());
}

#[test]
fn test_unknown_command_fails_without_outputs() {
    let dir = tempfile::tempdir().unwrap();

    let output = monitor(dir.path(), &["--no-gpu", "definitely-not-a-real-program-3f9a"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!dir.path().join("monitor_stats.csv").exists());
    assert!(!dir.path().join("monitor_usage.png").exists());
}

#[cfg(unix)]
#[test]
fn test_monitors_short_command() {
    let dir = tempfile::tempdir().unwrap();

    let output = monitor(dir.path(), &["--no-gpu", "--interval", "0.05", "sleep", "1"]);

    let table = std::fs::read_to_string(dir.path().join("monitor_stats.csv")).unwrap();
    let mut lines = table.lines();
    assert_eq!(lines.next(), Some(HEADER));

    let rows: Vec<Vec<f64>> = lines
        .map(|line| line.split(',').map(|v| v.parse::<f64>().unwrap()).collect())
        .collect();
    assert!(!rows.is_empty());
    for row in &rows {
        assert_eq!(row.len(), 5);
        assert!(row[0] >= 0.0);
        assert!(row[1] >= 0.0, "cpu_% {}", row[1]);
        assert!(row[2] >= 0.0, "mem_MB {}", row[2]);
    }
    assert!(rows.windows(2).all(|pair| pair[0][0] <= pair[1][0]));

    let chart = dir.path().join("monitor_usage.png");
    if chart.exists() {
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Saved: monitor_usage.png, monitor_stats.csv"));
    } else {
        // headless hosts without any system font cannot rasterize labels
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.to_lowercase().contains("font"), "stderr: {stderr}");
    }
}

#[cfg(unix)]
#[test]
fn test_custom_output_paths() {
    let dir = tempfile::tempdir().unwrap();

    std::fs::create_dir(dir.path().join("out")).unwrap();
    monitor(
        dir.path(),
        &["--no-gpu", "--csv", "out/stats.csv", "--chart", "out/usage.png", "true"],
    );
    let table = std::fs::read_to_string(dir.path().join("out/stats.csv")).unwrap();
    assert!(table.starts_with(HEADER));
    assert!(!dir.path().join("monitor_stats.csv").exists());
    assert!(!dir.path().join("monitor_usage.png").exists());

    // `true` usually exits before the first read; with no rows there is no chart
    let data_rows = table.lines().skip(1).count();
    if data_rows == 0 {
        assert!(!dir.path().join("out/usage.png").exists());
    }
}

#[cfg(unix)]
#[test]
fn test_interrupt_stops_sampling_but_waits_for_command() {
    let dir = tempfile::tempdir().unwrap();

    let child = Command::new(env!("CARGO_BIN_EXE_program-monitor"))
        .args(["--no-gpu", "--interval", "0.05", "sleep", "2"])
        .current_dir(dir.path())
        .env("RUST_LOG", "warn")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    let started = Instant::now();

    std::thread::sleep(Duration::from_millis(600));
    // only the monitor gets the signal; `sleep` keeps running
    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    let output = child.wait_with_output().unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Ctrl+C detected. Stopping sampling..."), "stderr: {stderr}");
    assert!(started.elapsed() >= Duration::from_millis(1900));

    let table = std::fs::read_to_string(dir.path().join("monitor_stats.csv")).unwrap();
    let last_time: f64 = table
        .lines()
        .skip(1)
        .last()
        .and_then(|row| row.split(',').next())
        .map(|t| t.parse().unwrap())
        .expect("samples before the interrupt");
    assert!(last_time < 0.7, "last sample at {last_time}s");

    if dir.path().join("monitor_usage.png").exists() {
        assert_eq!(output.status.code(), Some(0));
    }
}
