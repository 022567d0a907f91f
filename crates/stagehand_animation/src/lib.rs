//! Stagehand Animation System
//!
//! Turns discrete value changes into smooth visual transitions.
//!
//! # Features
//!
//! - **Time-based**: interpolate over a fixed duration with an easing curve,
//!   optionally after a fixed or randomized delay
//! - **Speed-based**: close a fixed fraction of the remaining distance every
//!   tick, snapping once close enough
//! - **Interruptible**: re-targeting mid-flight continues from the value on
//!   screen, never jumps
//! - **Cyclic values**: optional `[min, max)` wrapping for angles and phases

pub mod easing;
pub mod engine;
pub mod options;
pub mod record;
pub mod value;

pub use easing::Easing;
pub use engine::{AnimationEngine, AnimationKey, TargetId};
pub use options::{AnimationDefaults, SpeedOptions, TimeOptions};
pub use record::{AnimationMode, AnimationRecord, SpeedBased, TimeBased};
pub use value::AnimatedValue;
