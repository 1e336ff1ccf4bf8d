use crate::sample::SampleBuffer;
use crate::utils::errors::MonitoringError;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Write one CSV row per sample under a fixed header. An empty buffer still
/// produces the header line.
pub fn write_table(buffer: &SampleBuffer, path: &Path) -> Result<(), MonitoringError> {
    let mut frame = buffer.to_frame()?;
    let mut file = File::create(path)?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut frame)
        .map_err(|e| {
            MonitoringError::Report(format!("Failed to write {}: {}", path.display(), e))
        })?;

    Ok(())
}
