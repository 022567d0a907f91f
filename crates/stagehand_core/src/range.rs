//! Cyclic numeric ranges

use serde::{Deserialize, Serialize};

/// Half-open numeric interval `[min, max)` used to wrap cyclic quantities
/// such as angles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NumRange {
    pub min: f64,
    pub max: f64,
}

impl NumRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Width of the range
    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    /// A range can only wrap values if it has a finite, positive width
    pub fn is_valid(&self) -> bool {
        let size = self.size();
        size.is_finite() && size > 0.0
    }

    /// Check whether `value` lies in `[min, max)`
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }

    /// Wrap `value` into `[min, max)`.
    ///
    /// Values below `min` wrap forward by whole range widths. An invalid
    /// range returns `value` unchanged.
    pub fn normalize(&self, value: f64) -> f64 {
        if !self.is_valid() {
            return value;
        }
        let wrapped = self.min + (value - self.min).rem_euclid(self.size());
        // rem_euclid can round up to exactly `size` for tiny negative offsets
        if wrapped >= self.max {
            self.min
        } else {
            wrapped
        }
    }
}
