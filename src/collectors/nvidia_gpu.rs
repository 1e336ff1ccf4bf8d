use crate::collectors::{bytes_to_mb, milliwatts_to_watts};
use crate::utils::errors::MonitoringError;
use nvml_wrapper::Nvml;

/// Instantaneous draw and memory of one GPU.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GpuUsage {
    pub power_w: f64,
    pub memory_mb: f64,
}

pub struct NvidiaGpu {
    nvml: Nvml,
    device_index: u32,
}

impl NvidiaGpu {
    pub const DEFAULT_DEVICE: u32 = 0;

    /// Initialise NVML and make sure the device can be opened.
    pub fn new(device_index: u32) -> Result<Self, MonitoringError> {
        let nvml = Nvml::init()
            .map_err(|e| MonitoringError::Gpu(format!("Failed to initialise NVML: {}", e)))?;
        nvml.device_by_index(device_index).map_err(|e| {
            MonitoringError::Gpu(format!("Failed to open GPU {}: {}", device_index, e))
        })?;

        Ok(Self { nvml, device_index })
    }

    pub fn device_index(&self) -> u32 {
        self.device_index
    }

    pub fn usage(&self) -> Result<GpuUsage, MonitoringError> {
        let device = self
            .nvml
            .device_by_index(self.device_index)
            .map_err(|e| MonitoringError::Gpu(e.to_string()))?;
        let power_mw = device
            .power_usage()
            .map_err(|e| MonitoringError::Gpu(format!("power usage: {}", e)))?;
        let memory = device
            .memory_info()
            .map_err(|e| MonitoringError::Gpu(format!("memory info: {}", e)))?;

        Ok(GpuUsage {
            power_w: milliwatts_to_watts(power_mw),
            memory_mb: bytes_to_mb(memory.used),
        })
    }

    #[cfg(test)]
    pub fn is_available() -> bool {
        Nvml::init()
            .map(|nvml| nvml.device_by_index(Self::DEFAULT_DEVICE).is_ok())
            .unwrap_or(false)
    }
}
