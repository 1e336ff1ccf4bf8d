use crate::collectors::ResourceReader;
use crate::run_state::RunState;
use crate::sample::{Sample, SampleBuffer};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Default time between two samples.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// Spawn the sampling loop on the runtime. Awaiting the handle yields the
/// finished buffer once the loop has stopped.
pub fn spawn<R: ResourceReader>(
    reader: R,
    state: Arc<RunState>,
    interval: Duration,
) -> JoinHandle<SampleBuffer> {
    tokio::spawn(run(reader, state, interval))
}

/// Read, append and sleep until a stop is requested or the reader fails.
///
/// The stop flag is checked before each read, so a stop requested while a
/// read is in flight still lets that one sample land. A failed read ends
/// sampling; nothing is retried.
pub async fn run<R: ResourceReader>(
    mut reader: R,
    state: Arc<RunState>,
    interval: Duration,
) -> SampleBuffer {
    let mut buffer = SampleBuffer::new();
    info!("Sampling every {:?}", interval);

    while !state.is_stop_requested() {
        let elapsed = state.elapsed_secs();
        match reader.read().await {
            Ok(reading) => {
                let sample = Sample::new(elapsed, reading);
                debug!("{:?}", sample);
                buffer.push(sample);
            }
            Err(e) if e.is_process_vanished() => {
                info!("{}, sampling finished", e);
                break;
            }
            Err(e) => {
                warn!("Stopping sampling after read failure: {}", e);
                break;
            }
        }

        tokio::time::sleep(interval).await;
    }

    info!("Sampler stopped after {} samples", buffer.len());
    buffer
}
