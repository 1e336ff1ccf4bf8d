use crate::collectors::{ResourceReader, SystemReader};
use crate::config::MonitorConfig;
use crate::run_state::RunState;
use crate::sample::SampleBuffer;
use crate::sampler;
use crate::utils::errors::MonitoringError;
use log::{info, warn};
use std::process::ExitStatus;
use std::sync::Arc;
use tokio::process::{Child, Command};

/// What a finished run hands to the report writer.
#[derive(Debug)]
pub struct RunOutcome {
    pub samples: SampleBuffer,
    pub exit_status: ExitStatus,
}

/// Launches a command and samples it until it exits.
pub struct Monitor {
    config: MonitorConfig,
    state: Arc<RunState>,
}

impl Monitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            state: Arc::new(RunState::new()),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Shared run state; `request_stop()` on it ends sampling early while
    /// the command keeps running.
    pub fn state(&self) -> Arc<RunState> {
        Arc::clone(&self.state)
    }

    /// Monitor `command` with the sysinfo/NVML reader.
    pub async fn run(&self, command: &[String]) -> Result<RunOutcome, MonitoringError> {
        let gpu_enabled = self.config.gpu_enabled;
        self.run_with(command, |pid| {
            let reader = SystemReader::new(pid, gpu_enabled);
            if !reader.has_gpu() {
                info!("GPU sampling disabled");
            }
            reader
        })
        .await
    }

    /// Monitor `command`, building the reader from the child's pid.
    pub async fn run_with<R, F>(
        &self,
        command: &[String],
        make_reader: F,
    ) -> Result<RunOutcome, MonitoringError>
    where
        R: ResourceReader,
        F: FnOnce(u32) -> R,
    {
        let (program, args) = command.split_first().ok_or(MonitoringError::Usage)?;

        let mut child = Command::new(program)
            .args(args)
            .spawn()
            .map_err(|source| MonitoringError::Spawn {
                command: command.join(" "),
                source,
            })?;
        let pid = child.id().ok_or_else(|| {
            MonitoringError::ProcessDiscoveryError("spawned command has no pid".to_string())
        })?;
        info!("Monitoring command PID={}", pid);

        let sampler = sampler::spawn(make_reader(pid), self.state(), self.config.interval);

        let exit_status = wait_for_exit(&mut child, &self.state).await;

        // Stop and join even when waiting failed so the task is not left behind
        self.state.request_stop();
        let samples = sampler
            .await
            .map_err(|e| MonitoringError::Join(e.to_string()))?;
        let exit_status = exit_status?;

        info!(
            "Command exited with {}, {} samples collected",
            exit_status,
            samples.len()
        );
        Ok(RunOutcome {
            samples,
            exit_status,
        })
    }
}

/// Wait for the child, turning every Ctrl+C into a stop request. The child
/// shares our terminal and decides on its own whether to exit.
async fn wait_for_exit(child: &mut Child, state: &RunState) -> Result<ExitStatus, MonitoringError> {
    loop {
        tokio::select! {
            status = child.wait() => return Ok(status?),
            interrupt = tokio::signal::ctrl_c() => match interrupt {
                Ok(()) => {
                    eprintln!("\nCtrl+C detected. Stopping sampling...");
                    warn!("Interrupt received, sampling stops once the command exits");
                    state.request_stop();
                }
                Err(e) => {
                    warn!("Cannot listen for Ctrl+C: {}", e);
                    return Ok(child.wait().await?);
                }
            },
        }
    }
}
