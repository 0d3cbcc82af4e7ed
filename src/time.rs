//! Frame scheduling and the clock behind it.
//!
//! The simulation never sleeps or spins. It asks a [`FrameDriver`] for "one
//! more frame at the next display refresh" and is ticked by whoever owns the
//! event loop. The window host drives it from `RedrawRequested`; tests and
//! headless users drive it by hand with [`ManualDriver`].
//!
//! # Example
//!
//! ```ignore
//! use sdf_worms::time::{FrameDriver, ManualDriver};
//! use std::time::Duration;
//!
//! let mut driver = ManualDriver::new();
//! driver.request_frame();
//! driver.advance(Duration::from_millis(16));
//! assert!(driver.take_request());
//! ```

use std::time::{Duration, Instant};

/// Source of frame callbacks and of the time used for elapsed-time deltas.
pub trait FrameDriver {
    /// Ask for one tick at the next display refresh.
    fn request_frame(&mut self);

    /// Monotonic time since some fixed origin.
    fn now(&self) -> Duration;
}

/// Monotonic wall clock starting at construction.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Time since the clock was created.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// A driver whose time only moves when told to.
///
/// Requests are counted, not executed: the owner checks
/// [`take_request`](Self::take_request) and calls `tick()` itself.
#[derive(Debug, Default, Clone)]
pub struct ManualDriver {
    now: Duration,
    pending: bool,
    requests: u64,
}

impl ManualDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward.
    pub fn advance(&mut self, dt: Duration) {
        self.now += dt;
    }

    /// Move time forward by `secs` seconds.
    pub fn advance_secs(&mut self, secs: f32) {
        self.advance(Duration::from_secs_f32(secs));
    }

    /// Whether a frame is pending, clearing it.
    pub fn take_request(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Total number of requests ever made.
    pub fn requests(&self) -> u64 {
        self.requests
    }
}

impl FrameDriver for ManualDriver {
    fn request_frame(&mut self) {
        self.pending = true;
        self.requests += 1;
    }

    fn now(&self) -> Duration {
        self.now
    }
}
