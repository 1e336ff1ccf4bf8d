use crate::utils::errors::MonitoringError;
use itertools::multiunzip;
use polars::prelude::*;

/// Column names of the exported table, in order.
pub const COLUMNS: [&str; 5] = ["time_s", "cpu_%", "mem_MB", "gpu_power_W", "gpu_mem_MB"];

/// One resource reading without a timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Reading {
    pub cpu_percent: f64,
    pub memory_mb: f64,
    pub gpu_power_w: f64,
    pub gpu_memory_mb: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Seconds since the run started
    pub elapsed_s: f64,
    pub cpu_percent: f64,
    pub memory_mb: f64,
    pub gpu_power_w: f64,
    pub gpu_memory_mb: f64,
}

impl Sample {
    pub fn new(elapsed_s: f64, reading: Reading) -> Self {
        Self {
            elapsed_s,
            cpu_percent: reading.cpu_percent,
            memory_mb: reading.memory_mb,
            gpu_power_w: reading.gpu_power_w,
            gpu_memory_mb: reading.gpu_memory_mb,
        }
    }
}

/// Append-only samples of one monitoring run, in collection order.
#[derive(Debug, Clone, Default)]
pub struct SampleBuffer {
    samples: Vec<Sample>,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: Sample) {
        debug_assert!(
            self.samples
                .last()
                .is_none_or(|last| last.elapsed_s <= sample.elapsed_s),
            "samples must be appended in time order"
        );
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Time span covered by the buffer, `(0.0, 0.0)` when empty.
    pub fn time_range(&self) -> (f64, f64) {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => (first.elapsed_s, last.elapsed_s),
            _ => (0.0, 0.0),
        }
    }

    /// DataFrame: time_s | cpu_% | mem_MB | gpu_power_W | gpu_mem_MB
    pub fn to_frame(&self) -> Result<DataFrame, MonitoringError> {
        let (times, cpu, mem, power, gpu_mem): (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) =
            multiunzip(self.samples.iter().map(|s| {
                (
                    s.elapsed_s,
                    s.cpu_percent,
                    s.memory_mb,
                    s.gpu_power_w,
                    s.gpu_memory_mb,
                )
            }));

        df![
            COLUMNS[0] => times,
            COLUMNS[1] => cpu,
            COLUMNS[2] => mem,
            COLUMNS[3] => power,
            COLUMNS[4] => gpu_mem,
        ]
        .map_err(|e| MonitoringError::Report(format!("Failed to create sample DataFrame: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(cpu: f64) -> Reading {
        Reading {
            cpu_percent: cpu,
            memory_mb: 12.5,
            gpu_power_w: 30.0,
            gpu_memory_mb: 512.0,
        }
    }

    #[test]
    fn test_empty_buffer_frame_keeps_columns() {
        let frame = SampleBuffer::new().to_frame().unwrap();
        assert_eq!(frame.height(), 0);
        let names: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, COLUMNS);
    }

    #[test]
    fn test_frame_preserves_order() {
        let mut buffer = SampleBuffer::new();
        buffer.push(Sample::new(0.0, reading(1.0)));
        buffer.push(Sample::new(0.1, reading(2.0)));
        buffer.push(Sample::new(0.2, reading(3.0)));

        let frame = buffer.to_frame().unwrap();
        assert_eq!(frame.height(), 3);
        let cpu: Vec<f64> = frame
            .column("cpu_%")
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(cpu, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_time_range() {
        let mut buffer = SampleBuffer::new();
        assert_eq!(buffer.time_range(), (0.0, 0.0));
        buffer.push(Sample::new(0.5, reading(0.0)));
        buffer.push(Sample::new(1.5, reading(0.0)));
        assert_eq!(buffer.time_range(), (0.5, 1.5));
    }
}
