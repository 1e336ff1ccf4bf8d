pub mod utils {
    pub mod errors;
    pub mod logger;
}

pub mod collectors;
pub mod config;
pub mod lifecycle;
pub mod report;
pub mod run_state;
pub mod sample;
pub mod sampler;

use clap::Parser;
use config::{MonitorConfig, OutputPaths};
use lifecycle::Monitor;
use log::error;
use std::path::PathBuf;
use std::process::{ExitCode, ExitStatus};
use std::time::Duration;
use utils::errors::MonitoringError;

/// Sample CPU, memory and GPU usage of a command until it exits, then save
/// a CSV table and a chart.
#[derive(Parser, Debug)]
#[command(name = "program-monitor", version, trailing_var_arg = true)]
struct Cli {
    /// Seconds between two samples
    #[arg(short, long, default_value = "0.1", value_parser = parse_interval)]
    interval: Duration,

    /// CSV table output
    #[arg(long, default_value = config::DEFAULT_TABLE_PATH)]
    csv: PathBuf,

    /// PNG chart output
    #[arg(long, default_value = config::DEFAULT_CHART_PATH)]
    chart: PathBuf,

    /// Do not query the NVIDIA driver
    #[arg(long)]
    no_gpu: bool,

    /// Command to run and its arguments
    #[arg(allow_hyphen_values = true, value_name = "COMMAND")]
    command: Vec<String>,
}

impl Cli {
    fn config(&self) -> MonitorConfig {
        MonitorConfig {
            interval: self.interval,
            gpu_enabled: !self.no_gpu,
            outputs: OutputPaths {
                table: self.csv.clone(),
                chart: self.chart.clone(),
            },
        }
    }
}

fn parse_interval(value: &str) -> Result<Duration, String> {
    let seconds: f64 = value
        .parse()
        .map_err(|e| format!("invalid number `{}`: {}", value, e))?;
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(format!("interval must be a positive number of seconds, got {}", value));
    }
    Duration::try_from_secs_f64(seconds)
        .map_err(|e| format!("interval {} is out of range: {}", value, e))
}

/// Mirror the child's exit code; a child killed by a signal maps to 1.
fn exit_code(status: ExitStatus) -> u8 {
    status
        .code()
        .and_then(|code| u8::try_from(code).ok())
        .unwrap_or(1)
}

async fn run(cli: &Cli) -> Result<ExitCode, MonitoringError> {
    let monitor = Monitor::new(cli.config());
    let outcome = monitor.run(&cli.command).await?;
    let files = report::write(&outcome.samples, &monitor.config().outputs)?;
    println!("{}", files.summary());
    Ok(ExitCode::from(exit_code(outcome.exit_status)))
}

#[tokio::main]
async fn main() -> ExitCode {
    utils::logger::setup_logger();
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(code) => code,
        Err(MonitoringError::Usage) => {
            eprintln!("{}", MonitoringError::Usage);
            ExitCode::from(1)
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
