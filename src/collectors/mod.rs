pub mod nvidia_gpu;
pub mod process_tree;

pub use nvidia_gpu::{GpuUsage, NvidiaGpu};
pub use process_tree::ProcessTree;

use crate::sample::Reading;
use crate::utils::errors::MonitoringError;
use async_trait::async_trait;
use log::{debug, info, warn};

/// One-shot query of the resources used by the monitored command.
///
/// Implementations return `MonitoringError::ProcessVanished` once the
/// monitored process is gone; the sampler treats that as the end of the run.
#[async_trait]
pub trait ResourceReader: Send + 'static {
    async fn read(&mut self) -> Result<Reading, MonitoringError>;
}

pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}

pub fn milliwatts_to_watts(milliwatts: u32) -> f64 {
    milliwatts as f64 / 1000.0
}

/// Process tree usage from sysinfo plus device 0 from NVML.
pub struct SystemReader {
    tree: ProcessTree,
    gpu: Option<NvidiaGpu>,
}

impl SystemReader {
    pub fn new(pid: u32, gpu_enabled: bool) -> Self {
        let gpu = if gpu_enabled {
            match NvidiaGpu::new(NvidiaGpu::DEFAULT_DEVICE) {
                Ok(gpu) => {
                    info!("Sampling NVIDIA GPU {}", gpu.device_index());
                    Some(gpu)
                }
                Err(e) => {
                    warn!("{}; GPU columns will read 0", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            tree: ProcessTree::new(pid),
            gpu,
        }
    }

    pub fn has_gpu(&self) -> bool {
        self.gpu.is_some()
    }
}

#[async_trait]
impl ResourceReader for SystemReader {
    async fn read(&mut self) -> Result<Reading, MonitoringError> {
        let tree = self.tree.usage()?;

        let gpu = match &self.gpu {
            Some(gpu) => gpu.usage().unwrap_or_else(|e| {
                debug!("GPU query failed: {}", e);
                GpuUsage::default()
            }),
            None => GpuUsage::default(),
        };

        Ok(Reading {
            cpu_percent: tree.cpu_percent,
            memory_mb: tree.memory_mb,
            gpu_power_w: gpu.power_w,
            gpu_memory_mb: gpu.memory_mb,
        })
    }
}
