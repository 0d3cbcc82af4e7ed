//! The frame orchestrator.
//!
//! [`Simulation`] owns the alternation index and a small `stopped`/`running`
//! state machine. Each tick submits one compute dispatch followed by one
//! render draw on the current index, then flips the index. Because compute
//! at index `i` writes buffer `1 - i` while render at `i` reads buffer `i`,
//! what is on screen always lags the simulation by exactly one tick.
//!
//! The GPU work is behind [`FramePasses`] and the scheduling behind
//! [`FrameDriver`], so the whole loop runs without a device in tests.

use std::time::Duration;

use crate::config::WormsState;
use crate::error::SimulationError;
use crate::ping_pong::PingPong;
use crate::time::FrameDriver;

/// The per-frame GPU work of one simulation.
pub trait FramePasses {
    /// Encode compute then render at `index` and submit them together.
    ///
    /// An error means nothing was submitted.
    fn submit(&mut self, index: PingPong, delta_time: f32) -> Result<(), SimulationError>;

    /// Rewrite both parameter blocks from `state`.
    fn update(&mut self, state: &WormsState);

    /// Free the buffer pair. Called exactly once.
    fn release(&mut self);
}

/// A running (or stopped) worm simulation.
pub struct Simulation<P: FramePasses, D: FrameDriver> {
    passes: P,
    driver: D,
    running: bool,
    /// A frame has been requested and not yet ticked.
    scheduled: bool,
    disposed: bool,
    ping_pong: PingPong,
    /// Driver time of the previous tick. `None` right after play/stop.
    last_tick: Option<Duration>,
    frames: u64,
}

impl<P: FramePasses, D: FrameDriver> Simulation<P, D> {
    /// Wrap prepared passes. The simulation starts stopped at index 0.
    pub fn new(passes: P, driver: D) -> Self {
        Self {
            passes,
            driver,
            running: false,
            scheduled: false,
            disposed: false,
            ping_pong: PingPong::default(),
            last_tick: None,
            frames: 0,
        }
    }

    /// Start ticking. Does nothing once disposed.
    pub fn play(&mut self) {
        if self.disposed {
            log::debug!("play() ignored: simulation disposed");
            return;
        }
        if !self.running {
            log::debug!("simulation running");
        }
        self.running = true;
        if !self.scheduled {
            self.scheduled = true;
            self.driver.request_frame();
        }
    }

    /// Stop at the next tick boundary.
    ///
    /// A frame already scheduled still runs; nothing is scheduled after it.
    /// The first delta after the next `play` is zero.
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("simulation stopping after {} frames", self.frames);
        }
        self.running = false;
        if !self.scheduled {
            self.last_tick = None;
        }
    }

    /// Flip between running and stopped.
    pub fn toggle(&mut self) {
        if self.running {
            self.stop();
        } else {
            self.play();
        }
    }

    /// Apply new tunables to both stages. Index and scheduling are untouched.
    pub fn update(&mut self, state: &WormsState) {
        if self.disposed {
            return;
        }
        self.passes.update(state);
    }

    /// Stop for good and release the buffers. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        self.running = false;
        self.last_tick = None;
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.passes.release();
        log::info!("simulation disposed after {} frames", self.frames);
    }

    /// Run one scheduled frame.
    ///
    /// Returns `Ok(true)` if work was submitted. A tick that arrives with
    /// nothing scheduled, or after `dispose`, does nothing. A frame scheduled
    /// before `stop` still runs. When the passes fail the index and the
    /// previous tick time are kept, the error is returned, and the next frame
    /// is still requested while running.
    pub fn tick(&mut self) -> Result<bool, SimulationError> {
        if !self.scheduled {
            return Ok(false);
        }
        self.scheduled = false;
        if self.disposed {
            return Ok(false);
        }

        let now = self.driver.now();
        let delta_time = self
            .last_tick
            .map(|previous| now.saturating_sub(previous).as_secs_f32())
            .unwrap_or(0.0);

        let result = self.passes.submit(self.ping_pong, delta_time);
        match &result {
            Ok(()) => {
                self.last_tick = Some(now);
                log::trace!(
                    "frame {} at index {} (dt {:.4}s)",
                    self.frames,
                    self.ping_pong.index(),
                    delta_time
                );
                self.ping_pong.flip();
                self.frames += 1;
            }
            Err(err) => log::warn!("frame skipped: {}", err),
        }

        if self.running {
            self.scheduled = true;
            self.driver.request_frame();
        } else {
            self.last_tick = None;
            log::debug!("simulation stopped after {} frames", self.frames);
        }

        result.map(|()| true)
    }

    /// Index the next tick will use.
    pub fn ping_pong(&self) -> PingPong {
        self.ping_pong
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Frames submitted so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn passes(&self) -> &P {
        &self.passes
    }

    pub fn passes_mut(&mut self) -> &mut P {
        &mut self.passes
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}

impl<P: FramePasses, D: FrameDriver> Drop for Simulation<P, D> {
    fn drop(&mut self) {
        self.dispose();
    }
}
