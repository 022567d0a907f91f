//! Stagehand Application Runtime
//!
//! The frame loop and the built-in participants that sit between a host
//! (window, canvas, test harness) and application code.
//!
//! # Example
//!
//! ```rust
//! use stagehand_app::prelude::*;
//!
//! let mut runtime = HeadlessRuntime::new(StageConfig::default());
//! let radius = runtime.stage().animations().by_time(
//!     AnimationKey::new(TargetId::next(), "radius"),
//!     1.0,
//!     TimeOptions::new().duration(100.0).easing(Easing::Linear),
//! );
//! radius.set(2.0);
//!
//! runtime
//!     .run(HeadlessRunConfig { max_frames: 5, tick_ms: 20 }, |_, _| {})
//!     .unwrap();
//! assert_eq!(radius.get(), 2.0);
//! ```

pub mod clock;
pub mod config;
pub mod diagnostics;
pub mod headless;
pub mod input;
pub mod scheduler;
pub mod stage;
pub mod surface;

#[cfg(test)]
mod tests;

pub use clock::{ManualClock, SystemClock, WallClock};
pub use config::{ConfigError, DiagnosticsConfig, SchedulerConfig, StageConfig, SurfaceConfig};
pub use diagnostics::{DebugPanel, DebugValue, Diagnostics, DiagnosticsLogger};
pub use headless::{HeadlessContext, HeadlessRunConfig, HeadlessRuntime};
pub use input::InputLatch;
pub use scheduler::{FrameScheduler, PauseHandle, SchedulerClock, TickOutcome};
pub use stage::Stage;
pub use surface::{BackingResize, Surface, Transform};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::clock::{ManualClock, SystemClock, WallClock};
    pub use crate::config::StageConfig;
    pub use crate::diagnostics::{DebugValue, Diagnostics, DiagnosticsLogger};
    pub use crate::headless::{HeadlessContext, HeadlessRunConfig, HeadlessRuntime};
    pub use crate::input::InputLatch;
    pub use crate::scheduler::{FrameScheduler, PauseHandle, TickOutcome};
    pub use crate::stage::Stage;
    pub use crate::surface::{Surface, Transform};

    // Animation
    pub use stagehand_animation::{
        AnimatedValue, AnimationEngine, AnimationKey, Easing, SpeedOptions, TargetId, TimeOptions,
    };

    // Core types
    pub use stagehand_core::{
        FrameInfo, KeyPress, Modifiers, NumRange, Participant, Point, Result, Size, StageError,
    };
}
