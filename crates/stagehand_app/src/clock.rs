//! Wall-clock sources for the frame scheduler
//!
//! The scheduler samples a [`WallClock`] once per tick. [`SystemClock`] reads
//! the monotonic system clock; [`ManualClock`] only moves when told to, which
//! makes frame timing deterministic for headless runs and tests.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// A source of wall-clock time in milliseconds
pub trait WallClock {
    fn now_ms(&self) -> f64;
}

/// Monotonic system time, measured from the clock's creation
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl WallClock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// A clock that only moves when advanced
///
/// Clones share the same time, so a test can hand one clone to the scheduler
/// and keep another to drive it.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now_ms: Rc::new(Cell::new(start_ms)),
        }
    }

    /// Move forward by `delta_ms`
    pub fn advance(&self, delta_ms: f64) {
        self.now_ms.set(self.now_ms.get() + delta_ms);
    }

    /// Jump to an absolute time
    pub fn set(&self, now_ms: f64) {
        self.now_ms.set(now_ms);
    }
}

impl WallClock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }
}
