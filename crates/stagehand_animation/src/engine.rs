//! Animation engine
//!
//! Owns every active per-property animation and advances them once per
//! frame. Registration hands back an [`AnimatedValue`] handle that reads the
//! animated value and re-targets it on write; the same records can also be
//! reached by [`AnimationKey`].
//!
//! The engine is a [`Participant`]: register a clone of it with the
//! scheduler and keep another clone for registering animations.
//!
//! ```rust
//! use stagehand_animation::{AnimationEngine, AnimationKey, Easing, TargetId, TimeOptions};
//! use stagehand_core::{FrameClock, Participant};
//!
//! let clock = FrameClock::new();
//! let mut engine = AnimationEngine::new(clock.clone());
//!
//! let ball = TargetId::next();
//! let x = engine.by_time(
//!     AnimationKey::new(ball, "x"),
//!     0.0,
//!     TimeOptions::new().duration(100.0).easing(Easing::Linear),
//! );
//!
//! x.set(10.0);
//! let frame = clock.advance(50.0);
//! engine.update(&frame).unwrap();
//! assert_eq!(x.get(), 5.0);
//! ```

use crate::options::{AnimationDefaults, SpeedOptions, TimeOptions};
use crate::record::AnimationRecord;
use crate::value::AnimatedValue;
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rustc_hash::FxBuildHasher;
use stagehand_core::{FrameClock, FrameInfo, Participant, Result};
use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TARGET_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an object that owns animated properties
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(u64);

impl TargetId {
    /// Issue a fresh, process-unique identity
    pub fn next() -> Self {
        TargetId(NEXT_TARGET_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap an identity managed by the caller (entity ids, widget ids, ...)
    pub const fn from_raw(raw: u64) -> Self {
        TargetId(raw)
    }

    pub const fn to_raw(self) -> u64 {
        self.0
    }
}

/// The (object, property) pair an animation is registered under
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AnimationKey {
    pub target: TargetId,
    pub property: Cow<'static, str>,
}

impl AnimationKey {
    pub fn new(target: TargetId, property: impl Into<Cow<'static, str>>) -> Self {
        Self {
            target,
            property: property.into(),
        }
    }
}

impl fmt::Display for AnimationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.target.0, self.property)
    }
}

/// A record plus whether the engine still drives it
#[derive(Debug)]
pub(crate) struct Slot {
    pub(crate) record: AnimationRecord,
    pub(crate) attached: bool,
}

pub(crate) type SharedSlot = Rc<RefCell<Slot>>;

pub(crate) struct EngineInner {
    defaults: AnimationDefaults,
    slots: IndexMap<AnimationKey, SharedSlot, FxBuildHasher>,
    clock: FrameClock,
    rng: StdRng,
}

impl EngineInner {
    /// Re-target an attached slot at the current simulated time
    pub(crate) fn retarget(&mut self, slot: &SharedSlot, value: f64) -> bool {
        let now_ms = self.clock.now_ms();
        slot.borrow_mut().record.retarget(value, now_ms, &mut self.rng)
    }

    fn insert(&mut self, key: AnimationKey, record: AnimationRecord) -> SharedSlot {
        let slot = Rc::new(RefCell::new(Slot {
            record,
            attached: true,
        }));
        if let Some(previous) = self.slots.insert(key.clone(), Rc::clone(&slot)) {
            let mut previous = previous.borrow_mut();
            previous.attached = false;
            previous.record.freeze();
            tracing::debug!(%key, "animation replaced by a new registration");
        }
        slot
    }
}

/// Drives property animations once per frame
///
/// Cloning is cheap; clones share the same set of animations.
#[derive(Clone)]
pub struct AnimationEngine {
    inner: Rc<RefCell<EngineInner>>,
}

impl AnimationEngine {
    /// Create an engine with the built-in defaults
    pub fn new(clock: FrameClock) -> Self {
        Self::with_defaults(AnimationDefaults::default(), clock)
    }

    /// Create an engine with custom defaults; unusable values are replaced
    pub fn with_defaults(defaults: AnimationDefaults, clock: FrameClock) -> Self {
        let defaults = defaults.sanitized();
        let rng = match defaults.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            inner: Rc::new(RefCell::new(EngineInner {
                defaults,
                slots: IndexMap::default(),
                clock,
                rng,
            })),
        }
    }

    pub fn defaults(&self) -> AnimationDefaults {
        self.inner.borrow().defaults
    }

    /// Animate `key` over time. The value starts at rest on `initial`; every
    /// write to the returned handle starts a transition from the value
    /// currently observed.
    ///
    /// Registering a key that is already animated retires the previous
    /// registration: its handles keep the value they last showed.
    pub fn by_time(&self, key: AnimationKey, initial: f64, opts: TimeOptions) -> AnimatedValue {
        let mut inner = self.inner.borrow_mut();
        let resolved = opts.resolve(&inner.defaults);
        let now_ms = inner.clock.now_ms();
        tracing::debug!(
            %key,
            initial,
            duration_ms = resolved.duration_ms,
            easing = resolved.easing.name(),
            "registered time-based animation"
        );
        let slot = inner.insert(
            key.clone(),
            AnimationRecord::time_based(initial, now_ms, resolved),
        );
        AnimatedValue::new(key, slot, Rc::downgrade(&self.inner))
    }

    /// Animate `key` by exponential approach: each tick closes `speed` of the
    /// remaining distance until it is under the snap threshold.
    pub fn by_speed(&self, key: AnimationKey, initial: f64, opts: SpeedOptions) -> AnimatedValue {
        let mut inner = self.inner.borrow_mut();
        let resolved = opts.resolve(&inner.defaults);
        tracing::debug!(
            %key,
            initial,
            speed = resolved.speed,
            snap_threshold = resolved.snap_threshold,
            "registered speed-based animation"
        );
        let slot = inner.insert(key.clone(), AnimationRecord::speed_based(initial, resolved));
        AnimatedValue::new(key, slot, Rc::downgrade(&self.inner))
    }

    /// Current value of `key`, if it is animated
    pub fn get(&self, key: &AnimationKey) -> Option<f64> {
        self.inner
            .borrow()
            .slots
            .get(key)
            .map(|slot| slot.borrow().record.current_value())
    }

    /// Re-target `key`. Returns `false` if `key` is not animated or `value`
    /// already is its target.
    pub fn set(&self, key: &AnimationKey, value: f64) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(slot) = inner.slots.get(key).cloned() else {
            return false;
        };
        inner.retarget(&slot, value)
    }

    /// Progress of `key` in `[0, 1]`
    pub fn progress(&self, key: &AnimationKey) -> Option<f64> {
        self.inner
            .borrow()
            .slots
            .get(key)
            .map(|slot| slot.borrow().record.progress())
    }

    /// Snapshot of the record behind `key`
    pub fn record(&self, key: &AnimationKey) -> Option<AnimationRecord> {
        self.inner
            .borrow()
            .slots
            .get(key)
            .map(|slot| slot.borrow().record)
    }

    /// Stop animating `key`. Handles become plain values fixed on the last
    /// target, which is returned. Unknown keys are ignored.
    pub fn remove_animation(&self, key: &AnimationKey) -> Option<f64> {
        let slot = self.inner.borrow_mut().slots.shift_remove(key)?;
        let mut slot = slot.borrow_mut();
        slot.attached = false;
        let value = slot.record.settle();
        tracing::debug!(%key, value, "removed animation");
        Some(value)
    }

    /// Remove every animation, settling each on its target
    pub fn clear(&self) {
        let slots = std::mem::take(&mut self.inner.borrow_mut().slots);
        for slot in slots.values() {
            let mut slot = slot.borrow_mut();
            slot.attached = false;
            slot.record.settle();
        }
    }

    pub fn contains(&self, key: &AnimationKey) -> bool {
        self.inner.borrow().slots.contains_key(key)
    }

    /// Number of registered animations, terminal ones included
    pub fn len(&self) -> usize {
        self.inner.borrow().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().slots.is_empty()
    }

    /// Check if any animation still has somewhere to go
    pub fn has_active_animations(&self) -> bool {
        self.inner
            .borrow()
            .slots
            .values()
            .any(|slot| !slot.borrow().record.is_terminal())
    }

    /// Advance every animation to simulated time `now_ms`
    pub fn step(&self, now_ms: f64) {
        let inner = self.inner.borrow();
        for slot in inner.slots.values() {
            slot.borrow_mut().record.step(now_ms);
        }
    }
}

impl Default for AnimationEngine {
    fn default() -> Self {
        Self::new(FrameClock::new())
    }
}

impl fmt::Debug for AnimationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("AnimationEngine")
            .field("animations", &inner.slots.len())
            .field("defaults", &inner.defaults)
            .finish()
    }
}

impl Participant for AnimationEngine {
    fn name(&self) -> &str {
        "animate"
    }

    fn update(&mut self, frame: &FrameInfo) -> Result<()> {
        self.step(frame.time_ms);
        Ok(())
    }
}
