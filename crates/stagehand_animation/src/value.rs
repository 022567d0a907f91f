//! Handles to animated properties

use crate::engine::{AnimationKey, EngineInner, SharedSlot};
use std::cell::RefCell;
use std::fmt;
use std::rc::Weak;

/// An animated property
///
/// Reading returns the value currently on screen; writing re-targets the
/// animation. Once the animation is removed from the engine, replaced by a
/// newer registration, or the engine itself is dropped, the handle behaves
/// as a plain value and writes take effect immediately.
///
/// Clones refer to the same property. Dropping a handle does not remove the
/// animation; use [`AnimationEngine::remove_animation`](crate::AnimationEngine::remove_animation).
#[derive(Clone)]
pub struct AnimatedValue {
    key: AnimationKey,
    slot: SharedSlot,
    engine: Weak<RefCell<EngineInner>>,
}

impl AnimatedValue {
    pub(crate) fn new(key: AnimationKey, slot: SharedSlot, engine: Weak<RefCell<EngineInner>>) -> Self {
        Self { key, slot, engine }
    }

    /// The (object, property) pair this handle animates
    pub fn key(&self) -> &AnimationKey {
        &self.key
    }

    /// Current animated value
    pub fn get(&self) -> f64 {
        self.slot.borrow().record.current_value()
    }

    /// Assign a new target. Assigning the current target, NaN or an infinity
    /// does nothing.
    pub fn set(&self, value: f64) {
        if self.slot.borrow().attached {
            if let Some(engine) = self.engine.upgrade() {
                engine.borrow_mut().retarget(&self.slot, value);
                return;
            }
        }
        self.slot.borrow_mut().record.assign(value);
    }

    /// The value being animated toward (last value written)
    pub fn target(&self) -> f64 {
        self.slot.borrow().record.end_value()
    }

    /// Progress of the current transition in `[0, 1]`
    pub fn progress(&self) -> f64 {
        self.slot.borrow().record.progress()
    }

    /// Check if the value is still moving toward its target
    pub fn is_animating(&self) -> bool {
        let slot = self.slot.borrow();
        slot.attached && !slot.record.is_terminal() && self.engine.strong_count() > 0
    }

    /// Check if the engine still drives this value
    pub fn is_attached(&self) -> bool {
        self.slot.borrow().attached && self.engine.strong_count() > 0
    }
}

impl fmt::Debug for AnimatedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.borrow();
        f.debug_struct("AnimatedValue")
            .field("key", &self.key)
            .field("current", &slot.record.current_value())
            .field("target", &slot.record.end_value())
            .field("progress", &slot.record.progress())
            .field("attached", &slot.attached)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{AnimationEngine, AnimationKey, Easing, SpeedOptions, TargetId, TimeOptions};
    use stagehand_core::FrameClock;

    #[test]
    fn handle_survives_engine_drop_as_plain_value() {
        let clock = FrameClock::new();
        let engine = AnimationEngine::new(clock.clone());
        let x = engine.by_time(
            AnimationKey::new(TargetId::next(), "x"),
            1.0,
            TimeOptions::new().easing(Easing::Linear),
        );
        drop(engine);

        assert!(!x.is_attached());
        x.set(8.0);
        assert_eq!(x.get(), 8.0);
        assert_eq!(x.target(), 8.0);
        assert!(!x.is_animating());
    }

    #[test]
    fn clones_share_the_property() {
        let clock = FrameClock::new();
        let engine = AnimationEngine::new(clock.clone());
        let a = engine.by_speed(AnimationKey::new(TargetId::next(), "a"), 0.0, SpeedOptions::new());
        let b = a.clone();

        a.set(5.0);
        assert_eq!(b.target(), 5.0);
        assert!(b.is_animating());
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn debug_output_names_key() {
        let engine = AnimationEngine::default();
        let v = engine.by_speed(
            AnimationKey::new(TargetId::from_raw(42), "radius"),
            2.0,
            SpeedOptions::new(),
        );
        let text = format!("{v:?}");
        assert!(text.contains("radius"));
        assert!(text.contains("current: 2.0"));
    }
}
