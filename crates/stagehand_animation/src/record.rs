//! Per-property animation state

use crate::easing::Easing;
use crate::options::{ResolvedSpeed, ResolvedTime};
use rand::Rng;
use stagehand_core::NumRange;

/// Time-based interpolation parameters
#[derive(Clone, Copy, Debug)]
pub struct TimeBased {
    /// Simulated time at which the current transition starts (after its delay)
    pub start_time_ms: f64,
    pub duration_ms: f64,
    /// Delay applied to the most recent write
    pub delay_ms: f64,
    pub random_delay_max_ms: f64,
    pub easing: Easing,
}

/// Exponential-approach parameters
#[derive(Clone, Copy, Debug)]
pub struct SpeedBased {
    pub speed: f64,
    pub snap_threshold: f64,
}

/// How a record moves toward its target
#[derive(Clone, Copy, Debug)]
pub enum AnimationMode {
    TimeBased(TimeBased),
    SpeedBased(SpeedBased),
}

/// State of one animated property
#[derive(Clone, Copy, Debug)]
pub struct AnimationRecord {
    start_value: f64,
    end_value: f64,
    current_value: f64,
    progress: f64,
    mode: AnimationMode,
    range: Option<NumRange>,
}

impl AnimationRecord {
    /// A time-based record at rest on `initial`
    pub(crate) fn time_based(initial: f64, now_ms: f64, opts: ResolvedTime) -> Self {
        Self {
            start_value: initial,
            end_value: initial,
            current_value: initial,
            progress: 1.0,
            mode: AnimationMode::TimeBased(TimeBased {
                start_time_ms: now_ms,
                duration_ms: opts.duration_ms,
                delay_ms: opts.delay_ms,
                random_delay_max_ms: opts.random_delay_ms,
                easing: opts.easing,
            }),
            range: opts.range,
        }
    }

    /// A speed-based record at rest on `initial`
    pub(crate) fn speed_based(initial: f64, opts: ResolvedSpeed) -> Self {
        Self {
            start_value: initial,
            end_value: initial,
            current_value: initial,
            progress: 1.0,
            mode: AnimationMode::SpeedBased(SpeedBased {
                speed: opts.speed,
                snap_threshold: opts.snap_threshold,
            }),
            range: opts.range,
        }
    }

    pub fn start_value(&self) -> f64 {
        self.start_value
    }

    /// Last value assigned by a caller
    pub fn end_value(&self) -> f64 {
        self.end_value
    }

    /// Externally observable value
    pub fn current_value(&self) -> f64 {
        self.current_value
    }

    /// Progress in `[0, 1]`; `1` means the record is at rest
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn mode(&self) -> &AnimationMode {
        &self.mode
    }

    pub fn range(&self) -> Option<NumRange> {
        self.range
    }

    pub fn is_terminal(&self) -> bool {
        self.progress >= 1.0
    }

    /// Point the record at a new target.
    ///
    /// Returns `false` when `value` already is the target or is not finite;
    /// nothing changes in either case.
    pub(crate) fn retarget<R: Rng>(&mut self, value: f64, now_ms: f64, rng: &mut R) -> bool {
        if !value.is_finite() {
            tracing::warn!(value, "ignoring non-finite animation target");
            return false;
        }
        if value == self.end_value {
            return false;
        }
        match &mut self.mode {
            AnimationMode::TimeBased(time) => {
                // Start from what is on screen, not from the previous target
                self.start_value = self.current_value;
                if time.random_delay_max_ms > 0.0 {
                    time.delay_ms = rng.random_range(0.0..time.random_delay_max_ms);
                }
                time.start_time_ms = now_ms + time.delay_ms;
            }
            AnimationMode::SpeedBased(_) => {}
        }
        self.end_value = value;
        self.progress = 0.0;
        true
    }

    /// Advance toward the target at simulated time `now_ms`
    pub(crate) fn step(&mut self, now_ms: f64) {
        if self.is_terminal() {
            return;
        }
        match self.mode {
            AnimationMode::TimeBased(time) => {
                if now_ms < time.start_time_ms {
                    // still inside the delay window
                    return;
                }
                let elapsed = now_ms - time.start_time_ms;
                if elapsed >= time.duration_ms {
                    self.current_value = self.end_value;
                    self.progress = 1.0;
                } else {
                    self.progress = (elapsed / time.duration_ms).clamp(self.progress, 1.0);
                    self.current_value = self.start_value
                        + (self.end_value - self.start_value) * time.easing.apply(self.progress);
                }
            }
            AnimationMode::SpeedBased(speed) => {
                if (self.current_value - self.end_value).abs() < speed.snap_threshold {
                    self.current_value = self.end_value;
                    self.progress = 1.0;
                } else {
                    self.current_value += speed.speed * (self.end_value - self.current_value);
                }
            }
        }
        if let Some(range) = self.range {
            self.current_value = range.normalize(self.current_value);
        }
    }

    /// Freeze on the target; used when the record leaves the engine
    pub(crate) fn settle(&mut self) -> f64 {
        self.current_value = self.end_value;
        self.start_value = self.end_value;
        self.progress = 1.0;
        self.end_value
    }

    /// Freeze wherever the value currently is; used when a newer
    /// registration for the same property replaces this one
    pub(crate) fn freeze(&mut self) {
        self.start_value = self.current_value;
        self.end_value = self.current_value;
        self.progress = 1.0;
    }

    /// Write without animating
    pub(crate) fn assign(&mut self, value: f64) {
        if !value.is_finite() {
            tracing::warn!(value, "ignoring non-finite value");
            return;
        }
        self.start_value = value;
        self.end_value = value;
        self.current_value = value;
        self.progress = 1.0;
    }
}
