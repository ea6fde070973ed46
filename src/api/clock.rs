use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic time source the playback loop paces against, in seconds.
pub trait PlaybackClock {
    fn now_seconds(&self) -> f64;
}

/// Wall-clock time measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl PlaybackClock for SystemClock {
    fn now_seconds(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Manually advanced clock for deterministic hosts and tests.
///
/// Clones share the same time cell, so a test can keep a handle while the rig
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, seconds: f64) {
        self.now.set(seconds);
    }

    /// Moves time forward; negative deltas are ignored to stay monotonic.
    pub fn advance(&self, delta_seconds: f64) {
        if delta_seconds > 0.0 {
            self.now.set(self.now.get() + delta_seconds);
        }
    }
}

impl PlaybackClock for ManualClock {
    fn now_seconds(&self) -> f64 {
        self.now.get()
    }
}
