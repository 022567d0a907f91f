//! Frame scheduler
//!
//! Owns the simulation clock and the ordered participant list. Each tick
//! samples the wall clock, advances simulated time (unless paused), then runs
//! every participant's `update()` followed by every participant's `reset()`,
//! and finally flushes diagnostics.

use crate::clock::{SystemClock, WallClock};
use crate::config::{SchedulerConfig, DEFAULT_TICK_RATE};
use crate::diagnostics::{Diagnostics, DiagnosticsLogger};
use stagehand_core::{FrameClock, FrameInfo, Participant, Phase, Result, StageError};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Scheduler clock state
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SchedulerClock {
    /// Unpaused ticks completed
    pub frame_count: u64,
    /// Simulated milliseconds; frozen while paused
    pub simulated_time: f64,
    /// Wall-clock sample from the previous tick, paused or not
    pub last_wall_time: f64,
    /// Simulated milliseconds added by the latest tick
    pub delta_time: f64,
    /// Whether the latest tick was paused
    pub paused: bool,
}

/// Result of one tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// Participants ran for this frame
    Advanced(FrameInfo),
    /// The clock is paused; participants were skipped
    Paused,
}

impl TickOutcome {
    pub fn frame(&self) -> Option<FrameInfo> {
        match self {
            TickOutcome::Advanced(frame) => Some(*frame),
            TickOutcome::Paused => None,
        }
    }
}

/// Shareable pause switch
///
/// Safe to flip from any thread; the scheduler reads it at the start of each
/// tick.
#[derive(Clone, Debug, Default)]
pub struct PauseHandle {
    paused: Arc<AtomicBool>,
}

impl PauseHandle {
    pub fn new(paused: bool) -> Self {
        Self {
            paused: Arc::new(AtomicBool::new(paused)),
        }
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
    }

    /// Flip the state, returning the new value
    pub fn toggle(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::AcqRel)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }
}

/// Drives participants at a fixed target rate
pub struct FrameScheduler {
    clock: SchedulerClock,
    participants: Vec<Box<dyn Participant>>,
    wall: Box<dyn WallClock>,
    frame_clock: FrameClock,
    pause: PauseHandle,
    diagnostics: Diagnostics,
    log: DiagnosticsLogger,
    tick_rate: u32,
}

impl FrameScheduler {
    /// Create a scheduler reading time from `wall`
    pub fn new(config: &SchedulerConfig, wall: impl WallClock + 'static, diagnostics: Diagnostics) -> Self {
        let config = config.sanitized();
        let now = wall.now_ms();
        Self {
            clock: SchedulerClock {
                last_wall_time: now,
                paused: config.start_paused,
                ..Default::default()
            },
            participants: Vec::new(),
            wall: Box::new(wall),
            frame_clock: FrameClock::new(),
            pause: PauseHandle::new(config.start_paused),
            log: diagnostics.namespace("app"),
            diagnostics,
            tick_rate: config.tick_rate,
        }
    }

    /// Create a scheduler on the system clock
    pub fn with_system_clock(config: &SchedulerConfig) -> Self {
        Self::new(config, SystemClock::new(), Diagnostics::default())
    }

    /// Append a participant; it runs after everything registered before it
    pub fn register<P: Participant + 'static>(&mut self, participant: P) {
        tracing::debug!(
            participant = participant.name(),
            position = self.participants.len(),
            "registered participant"
        );
        self.participants.push(Box::new(participant));
    }

    /// Participant names in execution order
    pub fn participant_names(&self) -> Vec<&str> {
        self.participants.iter().map(|p| p.name()).collect()
    }

    pub fn clock(&self) -> SchedulerClock {
        self.clock
    }

    /// Shared view of the latest frame, for engines and host code
    pub fn frame_clock(&self) -> FrameClock {
        self.frame_clock.clone()
    }

    pub fn pause_handle(&self) -> PauseHandle {
        self.pause.clone()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    pub fn set_tick_rate(&mut self, tick_rate: u32) {
        self.tick_rate = if tick_rate == 0 {
            tracing::warn!(fallback = DEFAULT_TICK_RATE, "tick_rate must be positive; using default");
            DEFAULT_TICK_RATE
        } else {
            tick_rate
        };
    }

    /// Target spacing between ticks
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate as f64)
    }

    /// Run one frame
    pub fn tick(&mut self) -> Result<TickOutcome> {
        let now = self.wall.now_ms();
        self.clock.paused = self.pause.is_paused();

        if self.clock.paused {
            self.clock.delta_time = 0.0;
            self.clock.last_wall_time = now;
            tracing::trace!(wall_ms = now, "tick skipped while paused");
            return Ok(TickOutcome::Paused);
        }

        let delta = (now - self.clock.last_wall_time).max(0.0);
        self.clock.delta_time = delta;
        self.clock.simulated_time += delta;
        self.clock.frame_count += 1;
        self.clock.last_wall_time = now;

        let frame = FrameInfo {
            frame: self.clock.frame_count,
            time_ms: self.clock.simulated_time,
            dt_ms: delta,
            wall_ms: now,
        };
        self.frame_clock.publish(frame);
        tracing::trace!(frame = frame.frame, time_ms = frame.time_ms, dt_ms = frame.dt_ms, "tick");

        self.log.log_value("frame", frame.frame);
        self.log.log_value("time", frame.time_ms);
        self.log.log_value("dt", frame.dt_ms);

        if let Err(err) = self.run_participants(&frame) {
            // an aborted frame's lines must not be flushed under the next one
            self.diagnostics.discard_live();
            return Err(err);
        }

        self.diagnostics.flush(&frame);
        Ok(TickOutcome::Advanced(frame))
    }

    fn run_participants(&mut self, frame: &FrameInfo) -> Result<()> {
        for participant in &mut self.participants {
            participant
                .update(frame)
                .map_err(|source| failure(participant.name(), Phase::Update, source))?;
        }
        for participant in &mut self.participants {
            participant
                .reset(frame)
                .map_err(|source| failure(participant.name(), Phase::Reset, source))?;
        }
        Ok(())
    }

    /// Tick `ticks` times, sleeping the target interval between ticks
    pub fn run_for(&mut self, ticks: u64) -> Result<()> {
        for i in 0..ticks {
            if i > 0 {
                thread::sleep(self.frame_interval());
            }
            self.tick()?;
        }
        Ok(())
    }

    /// Tick until `done` returns true, returning the number of ticks run
    pub fn run_until<F>(&mut self, mut done: F) -> Result<u64>
    where
        F: FnMut(&SchedulerClock) -> bool,
    {
        let mut ticks = 0;
        while !done(&self.clock) {
            if ticks > 0 {
                thread::sleep(self.frame_interval());
            }
            self.tick()?;
            ticks += 1;
        }
        Ok(ticks)
    }
}

fn failure(participant: &str, phase: Phase, source: StageError) -> StageError {
    tracing::error!(participant, %phase, error = %source, "participant failed; tick aborted");
    StageError::Participant {
        participant: participant.to_string(),
        phase,
        source: Box::new(source),
    }
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("clock", &self.clock)
            .field("participants", &self.participant_names())
            .field("tick_rate", &self.tick_rate)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn scheduler() -> (FrameScheduler, ManualClock) {
        let wall = ManualClock::new(1_000.0);
        let scheduler = FrameScheduler::new(&SchedulerConfig::default(), wall.clone(), Diagnostics::default());
        (scheduler, wall)
    }

    #[test]
    fn first_tick_measures_from_construction() {
        let (mut s, wall) = scheduler();
        wall.advance(33.0);
        let frame = s.tick().unwrap().frame().unwrap();
        assert_eq!(frame.dt_ms, 33.0);
        assert_eq!(frame.time_ms, 33.0);
        assert_eq!(frame.frame, 1);
        assert_eq!(s.frame_clock().frame(), frame);
    }

    #[test]
    fn pause_toggle_reports_new_state() {
        let handle = PauseHandle::default();
        assert!(handle.toggle());
        assert!(handle.is_paused());
        assert!(!handle.toggle());
        assert!(!handle.is_paused());
    }

    #[test]
    fn start_paused_skips_participants() {
        let wall = ManualClock::new(0.0);
        let config = SchedulerConfig {
            start_paused: true,
            ..Default::default()
        };
        let mut s = FrameScheduler::new(&config, wall.clone(), Diagnostics::default());
        wall.advance(10.0);
        assert_eq!(s.tick().unwrap(), TickOutcome::Paused);
        assert!(s.clock().paused);
        assert_eq!(s.clock().frame_count, 0);
    }

    #[test]
    fn zero_tick_rate_defaults() {
        let (mut s, _) = scheduler();
        s.set_tick_rate(0);
        assert_eq!(s.tick_rate(), 30);
        s.set_tick_rate(50);
        assert_eq!(s.frame_interval(), Duration::from_millis(20));
    }

    #[test]
    fn backwards_wall_clock_never_rewinds_time() {
        let (mut s, wall) = scheduler();
        wall.advance(20.0);
        s.tick().unwrap();
        wall.set(500.0);
        s.tick().unwrap();
        assert_eq!(s.clock().delta_time, 0.0);
        assert_eq!(s.clock().simulated_time, 20.0);
    }
}
