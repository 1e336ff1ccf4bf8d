pub mod chart;
pub mod table;

pub use chart::write_chart;
pub use table::write_table;

use crate::config::OutputPaths;
use crate::sample::SampleBuffer;
use crate::utils::errors::MonitoringError;
use log::{info, warn};
use std::path::PathBuf;

/// Files produced for one run. `chart` is `None` when there was nothing to plot.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFiles {
    pub table: PathBuf,
    pub chart: Option<PathBuf>,
}

impl ReportFiles {
    pub fn summary(&self) -> String {
        match &self.chart {
            Some(chart) => format!("Saved: {}, {}", chart.display(), self.table.display()),
            None => format!("Saved: {}", self.table.display()),
        }
    }
}

/// Write the table, then the chart unless the buffer is empty.
pub fn write(buffer: &SampleBuffer, outputs: &OutputPaths) -> Result<ReportFiles, MonitoringError> {
    write_table(buffer, &outputs.table)?;
    info!("Wrote {} rows to {}", buffer.len(), outputs.table.display());

    let chart = if buffer.is_empty() {
        warn!("No samples collected, skipping {}", outputs.chart.display());
        None
    } else {
        write_chart(buffer, &outputs.chart)?;
        info!("Wrote chart to {}", outputs.chart.display());
        Some(outputs.chart.clone())
    };

    Ok(ReportFiles {
        table: outputs.table.clone(),
        chart,
    })
}
