use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitoringError {
    #[error("Usage: program-monitor [OPTIONS] <command> [args...]")]
    Usage,
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Process {0} vanished")]
    ProcessVanished(u32),
    #[error("Process discovery error: {0}")]
    ProcessDiscoveryError(String),
    #[error("GPU error: {0}")]
    Gpu(String),
    #[error("Report error: {0}")]
    Report(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Sampler task failed: {0}")]
    Join(String),
}

impl MonitoringError {
    /// True when the error only means the monitored command has ended.
    pub fn is_process_vanished(&self) -> bool {
        matches!(self, MonitoringError::ProcessVanished(_))
    }
}
