use std::path::PathBuf;
use std::time::Duration;

use crate::sampler::DEFAULT_INTERVAL;

pub const DEFAULT_TABLE_PATH: &str = "monitor_stats.csv";
pub const DEFAULT_CHART_PATH: &str = "monitor_usage.png";

/// Where the report files of a run are written. Existing files are overwritten.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub table: PathBuf,
    pub chart: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            table: PathBuf::from(DEFAULT_TABLE_PATH),
            chart: PathBuf::from(DEFAULT_CHART_PATH),
        }
    }
}

impl OutputPaths {
    /// Default file names placed under `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            table: dir.join(DEFAULT_TABLE_PATH),
            chart: dir.join(DEFAULT_CHART_PATH),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Time between two samples
    pub interval: Duration,
    /// Query NVML for GPU device 0
    pub gpu_enabled: bool,
    pub outputs: OutputPaths,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            gpu_enabled: true,
            outputs: OutputPaths::default(),
        }
    }
}
