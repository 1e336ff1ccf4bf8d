use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// State shared between the controller, the sampler task and the
/// interrupt listener for the duration of one run.
#[derive(Debug)]
pub struct RunState {
    start: Instant,
    stop_requested: AtomicBool,
}

impl RunState {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            stop_requested: AtomicBool::new(false),
        }
    }

    /// Seconds since the run started, on a monotonic clock.
    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Relaxed);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Relaxed)
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}
