//! Stagehand Core
//!
//! Foundational primitives shared by every Stagehand crate:
//!
//! - **Frame clock**: the per-tick time snapshot published by the scheduler
//! - **Participants**: the `update()` / `reset()` lifecycle driven every tick
//! - **Geometry**: logical-space points and sizes, cyclic numeric ranges
//! - **Input events**: key presses and modifier flags latched from the host
//!
//! # Example
//!
//! ```rust
//! use stagehand_core::{FrameInfo, Participant, Result};
//!
//! struct Counter {
//!     frames: u64,
//! }
//!
//! impl Participant for Counter {
//!     fn name(&self) -> &str {
//!         "counter"
//!     }
//!
//!     fn update(&mut self, _frame: &FrameInfo) -> Result<()> {
//!         self.frames += 1;
//!         Ok(())
//!     }
//! }
//! ```

pub mod error;
pub mod events;
pub mod frame;
pub mod geometry;
pub mod range;

pub use error::{Phase, Result, StageError};
pub use events::{KeyPress, Modifiers};
pub use frame::{FrameClock, FrameInfo, Participant};
pub use geometry::{Point, Size};
pub use range::NumRange;
