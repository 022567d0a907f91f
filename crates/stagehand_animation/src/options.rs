//! Registration options and engine-wide defaults
//!
//! Options are best-effort: values that cannot drive an animation (a zero
//! duration, a speed outside `(0, 1]`, a negative delay, an empty range) fall
//! back to the engine defaults with a warning instead of failing the
//! registration.

use crate::easing::Easing;
use serde::{Deserialize, Serialize};
use stagehand_core::NumRange;

pub const DEFAULT_DURATION_MS: f64 = 300.0;
pub const DEFAULT_SPEED: f64 = 0.1;
pub const DEFAULT_SNAP_THRESHOLD: f64 = 0.01;

/// Engine-wide defaults applied to options left unset
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationDefaults {
    /// Duration of time-based animations in milliseconds
    pub duration_ms: f64,
    /// Fraction of the remaining distance closed per tick by speed-based animations
    pub speed: f64,
    /// Distance under which speed-based animations snap to their target
    pub snap_threshold: f64,
    /// Easing for time-based animations
    pub easing: Easing,
    /// Seed for randomized delays; `None` seeds from the OS
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for AnimationDefaults {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            speed: DEFAULT_SPEED,
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            easing: Easing::EaseOut,
            seed: None,
        }
    }
}

impl AnimationDefaults {
    /// Replace unusable values with the built-in defaults
    pub fn sanitized(self) -> Self {
        Self {
            duration_ms: positive_or("duration_ms", self.duration_ms, DEFAULT_DURATION_MS),
            speed: speed_or("speed", self.speed, DEFAULT_SPEED),
            snap_threshold: positive_or(
                "snap_threshold",
                self.snap_threshold,
                DEFAULT_SNAP_THRESHOLD,
            ),
            easing: self.easing,
            seed: self.seed,
        }
    }
}

/// Options for [`AnimationEngine::by_time`](crate::AnimationEngine::by_time)
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeOptions {
    pub duration_ms: Option<f64>,
    pub easing: Option<Easing>,
    /// Fixed delay between a write and the start of the transition
    pub delay_ms: Option<f64>,
    /// When positive, every write picks a fresh delay uniformly in `[0, random_delay_ms)`
    pub random_delay_ms: Option<f64>,
    pub range: Option<NumRange>,
}

impl TimeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration(mut self, ms: f64) -> Self {
        self.duration_ms = Some(ms);
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn delay(mut self, ms: f64) -> Self {
        self.delay_ms = Some(ms);
        self
    }

    pub fn random_delay(mut self, max_ms: f64) -> Self {
        self.random_delay_ms = Some(max_ms);
        self
    }

    /// Wrap the animated value into `[min, max)` every tick
    pub fn wrap(mut self, range: NumRange) -> Self {
        self.range = Some(range);
        self
    }

    pub(crate) fn resolve(self, defaults: &AnimationDefaults) -> ResolvedTime {
        ResolvedTime {
            duration_ms: self
                .duration_ms
                .map(|d| positive_or("duration_ms", d, defaults.duration_ms))
                .unwrap_or(defaults.duration_ms),
            easing: self.easing.unwrap_or(defaults.easing),
            delay_ms: self
                .delay_ms
                .map(|d| non_negative_or("delay_ms", d))
                .unwrap_or(0.0),
            random_delay_ms: self
                .random_delay_ms
                .map(|d| non_negative_or("random_delay_ms", d))
                .unwrap_or(0.0),
            range: valid_range(self.range),
        }
    }
}

/// Options for [`AnimationEngine::by_speed`](crate::AnimationEngine::by_speed)
#[derive(Clone, Copy, Debug, Default)]
pub struct SpeedOptions {
    pub speed: Option<f64>,
    pub snap_threshold: Option<f64>,
    pub range: Option<NumRange>,
}

impl SpeedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn snap_threshold(mut self, threshold: f64) -> Self {
        self.snap_threshold = Some(threshold);
        self
    }

    /// Wrap the animated value into `[min, max)` every tick
    pub fn wrap(mut self, range: NumRange) -> Self {
        self.range = Some(range);
        self
    }

    pub(crate) fn resolve(self, defaults: &AnimationDefaults) -> ResolvedSpeed {
        ResolvedSpeed {
            speed: self
                .speed
                .map(|s| speed_or("speed", s, defaults.speed))
                .unwrap_or(defaults.speed),
            snap_threshold: self
                .snap_threshold
                .map(|t| positive_or("snap_threshold", t, defaults.snap_threshold))
                .unwrap_or(defaults.snap_threshold),
            range: valid_range(self.range),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct ResolvedTime {
    pub duration_ms: f64,
    pub easing: Easing,
    pub delay_ms: f64,
    pub random_delay_ms: f64,
    pub range: Option<NumRange>,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct ResolvedSpeed {
    pub speed: f64,
    pub snap_threshold: f64,
    pub range: Option<NumRange>,
}

fn positive_or(field: &str, value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        tracing::warn!(field, value, fallback, "animation option must be positive; using default");
        fallback
    }
}

fn speed_or(field: &str, value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        value
    } else {
        tracing::warn!(field, value, fallback, "animation speed must be in (0, 1]; using default");
        fallback
    }
}

fn non_negative_or(field: &str, value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        tracing::warn!(field, value, "animation delay must be non-negative; using 0");
        0.0
    }
}

fn valid_range(range: Option<NumRange>) -> Option<NumRange> {
    match range {
        Some(r) if !r.is_valid() => {
            tracing::warn!(min = r.min, max = r.max, "ignoring empty animation range");
            None
        }
        other => other,
    }
}
