//! Headless runtime for deterministic frame execution.

use crate::clock::ManualClock;
use crate::config::StageConfig;
use crate::scheduler::TickOutcome;
use crate::stage::Stage;
use anyhow::{bail, Context, Result};

/// Configuration for a headless run.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessRunConfig {
    /// Number of frames to execute.
    pub max_frames: u32,
    /// Wall-clock milliseconds between frames.
    pub tick_ms: u64,
}

impl Default for HeadlessRunConfig {
    fn default() -> Self {
        Self {
            max_frames: 1,
            tick_ms: 16,
        }
    }
}

/// Frame context passed to headless frame callbacks.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessContext {
    pub frame_index: u32,
    pub elapsed_ms: u64,
    pub outcome: TickOutcome,
}

/// A stage driven by a manual clock, ticked without sleeping.
#[derive(Debug)]
pub struct HeadlessRuntime {
    stage: Stage,
    clock: ManualClock,
    elapsed_ms: u64,
}

impl HeadlessRuntime {
    pub fn new(config: StageConfig) -> Self {
        let clock = ManualClock::new(0.0);
        let stage = Stage::with_wall_clock(config, clock.clone());
        Self {
            stage,
            clock,
            elapsed_ms: 0,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    /// The clock driving the stage; advancing it between runs is allowed.
    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Run a fixed frame budget.
    pub fn run<F>(&mut self, cfg: HeadlessRunConfig, mut on_frame: F) -> Result<()>
    where
        F: FnMut(&Stage, &HeadlessContext),
    {
        if cfg.max_frames == 0 {
            bail!("headless max_frames must be > 0");
        }
        if cfg.tick_ms == 0 {
            bail!("headless tick_ms must be > 0");
        }

        for frame in 0..cfg.max_frames {
            self.clock.advance(cfg.tick_ms as f64);
            self.elapsed_ms = self.elapsed_ms.saturating_add(cfg.tick_ms);
            let outcome = self
                .stage
                .tick()
                .with_context(|| format!("headless frame {frame} failed"))?;
            on_frame(
                &self.stage,
                &HeadlessContext {
                    frame_index: frame,
                    elapsed_ms: self.elapsed_ms,
                    outcome,
                },
            );
        }

        Ok(())
    }
}
