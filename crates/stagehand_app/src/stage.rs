//! Stage composition
//!
//! A [`Stage`] is a scheduler with the built-in participants already
//! registered in their canonical order: surface, input latch, animation
//! engine. Application participants registered afterwards therefore see
//! this frame's transform, this frame's input in logical units, and this
//! frame's animated values.

use crate::clock::{SystemClock, WallClock};
use crate::config::StageConfig;
use crate::diagnostics::Diagnostics;
use crate::input::InputLatch;
use crate::scheduler::{FrameScheduler, PauseHandle, SchedulerClock, TickOutcome};
use crate::surface::Surface;
use stagehand_animation::AnimationEngine;
use stagehand_core::{FrameClock, Participant, Result};

/// Scheduler plus built-in participants
#[derive(Debug)]
pub struct Stage {
    config: StageConfig,
    scheduler: FrameScheduler,
    surface: Surface,
    input: InputLatch,
    animations: AnimationEngine,
    diagnostics: Diagnostics,
}

impl Stage {
    /// Build a stage driven by the system clock
    pub fn new(config: StageConfig) -> Self {
        Self::with_wall_clock(config, SystemClock::new())
    }

    /// Build a stage driven by `wall`
    pub fn with_wall_clock(config: StageConfig, wall: impl WallClock + 'static) -> Self {
        let config = config.sanitized();
        let diagnostics = Diagnostics::new(config.diagnostics.enabled);

        let mut scheduler = FrameScheduler::new(&config.scheduler, wall, diagnostics.clone());
        let surface = Surface::new(&config.surface).with_diagnostics(diagnostics.namespace("surface"));
        let input = InputLatch::new(surface.clone());
        let animations = AnimationEngine::with_defaults(config.animation, scheduler.frame_clock());

        scheduler.register(surface.clone());
        scheduler.register(input.clone());
        scheduler.register(animations.clone());

        tracing::debug!(
            tick_rate = scheduler.tick_rate(),
            diagnostics = config.diagnostics.enabled,
            "stage ready"
        );

        Self {
            config,
            scheduler,
            surface,
            input,
            animations,
            diagnostics,
        }
    }

    /// Register an application participant after the built-ins
    pub fn register<P: Participant + 'static>(&mut self, participant: P) {
        self.scheduler.register(participant);
    }

    /// Configuration after sanitizing
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn input(&self) -> &InputLatch {
        &self.input
    }

    pub fn animations(&self) -> &AnimationEngine {
        &self.animations
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn frame_clock(&self) -> FrameClock {
        self.scheduler.frame_clock()
    }

    pub fn clock(&self) -> SchedulerClock {
        self.scheduler.clock()
    }

    pub fn pause_handle(&self) -> PauseHandle {
        self.scheduler.pause_handle()
    }

    pub fn tick(&mut self) -> Result<TickOutcome> {
        self.scheduler.tick()
    }

    pub fn run_for(&mut self, ticks: u64) -> Result<()> {
        self.scheduler.run_for(ticks)
    }

    pub fn run_until<F>(&mut self, done: F) -> Result<u64>
    where
        F: FnMut(&SchedulerClock) -> bool,
    {
        self.scheduler.run_until(done)
    }
}
