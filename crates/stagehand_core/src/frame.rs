//! Frame timing and the participant lifecycle
//!
//! The scheduler publishes a [`FrameInfo`] at the start of every unpaused
//! tick. Participants receive it directly in `update()` / `reset()`; anything
//! that needs the simulation time outside of those calls (an animated value
//! being re-targeted from host code, for instance) reads it through a cloned
//! [`FrameClock`].

use crate::error::Result;
use std::cell::Cell;
use std::rc::Rc;

/// Snapshot of the scheduler clock for one tick
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInfo {
    /// Number of unpaused ticks completed, including this one
    pub frame: u64,
    /// Simulated time in milliseconds; frozen while paused
    pub time_ms: f64,
    /// Milliseconds of simulated time added by this tick
    pub dt_ms: f64,
    /// Wall-clock sample taken at the start of this tick, in milliseconds
    pub wall_ms: f64,
}

/// Shared, read-mostly view of the latest [`FrameInfo`]
///
/// Cloning is cheap; all clones observe the same clock. Only the scheduler
/// should call [`FrameClock::publish`].
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    current: Rc<Cell<FrameInfo>>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest published frame
    pub fn frame(&self) -> FrameInfo {
        self.current.get()
    }

    /// Simulated time in milliseconds
    pub fn now_ms(&self) -> f64 {
        self.current.get().time_ms
    }

    /// Replace the published frame
    pub fn publish(&self, frame: FrameInfo) {
        self.current.set(frame);
    }

    /// Move simulated time forward by `dt_ms` without a scheduler.
    ///
    /// Intended for driving engines in isolation (tests, offline rendering).
    pub fn advance(&self, dt_ms: f64) -> FrameInfo {
        let prev = self.current.get();
        let next = FrameInfo {
            frame: prev.frame + 1,
            time_ms: prev.time_ms + dt_ms,
            dt_ms,
            wall_ms: prev.wall_ms + dt_ms,
        };
        self.current.set(next);
        next
    }
}

/// A unit of work driven by the scheduler every tick
///
/// Participants run strictly in registration order: every `update()` first,
/// then every `reset()`. Later participants observe what earlier ones did in
/// the same frame. Neither call may block.
///
/// Returning an error aborts the remainder of the tick; the scheduler does not
/// isolate participants from one another.
pub trait Participant {
    /// Name used in diagnostics and error reports
    fn name(&self) -> &str;

    /// Advance frame-local state
    fn update(&mut self, _frame: &FrameInfo) -> Result<()> {
        Ok(())
    }

    /// Clear transient per-frame state
    fn reset(&mut self, _frame: &FrameInfo) -> Result<()> {
        Ok(())
    }
}

impl<P: Participant + ?Sized> Participant for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn update(&mut self, frame: &FrameInfo) -> Result<()> {
        (**self).update(frame)
    }

    fn reset(&mut self, frame: &FrameInfo) -> Result<()> {
        (**self).reset(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_published_frame() {
        let clock = FrameClock::new();
        let reader = clock.clone();

        clock.publish(FrameInfo {
            frame: 3,
            time_ms: 120.0,
            dt_ms: 40.0,
            wall_ms: 5000.0,
        });

        assert_eq!(reader.frame().frame, 3);
        assert_eq!(reader.now_ms(), 120.0);
    }

    #[test]
    fn advance_accumulates_time() {
        let clock = FrameClock::new();
        clock.advance(16.0);
        let frame = clock.advance(16.0);

        assert_eq!(frame.frame, 2);
        assert_eq!(frame.time_ms, 32.0);
        assert_eq!(frame.dt_ms, 16.0);
    }
}
