//! Easing functions for animations

use serde::{Deserialize, Serialize};

/// Easing function type
///
/// Maps linear progress in `[0, 1]` to eased progress in `[0, 1]`. The cubic
/// curves hit both endpoints exactly.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    /// Cubic ease-in
    EaseIn,
    /// Cubic ease-out
    EaseOut,
    /// Cubic ease-in-out
    EaseInOut,
    /// Caller-supplied curve; cannot be read from configuration
    #[serde(skip)]
    Custom(fn(f64) -> f64),
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::Custom(f) => f(t),
        }
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
            Easing::Custom(_) => "custom",
        }
    }
}
