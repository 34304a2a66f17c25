//! Easing curves for tile pulses.
//!
//! A pulse reads its scale as `lerp(from, to, easing.apply(t))`. Every curve
//! pins `0 -> 0` and `1 -> 1`, so a finished pulse rests exactly on `to`.

use serde::{Deserialize, Serialize};

/// How a pulse moves from its start scale to its end scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant speed.
    #[default]
    Linear,
    /// Most of the change up front, then a slow settle: `1 - 2^(-10t)`.
    ExponentialOut,
    /// Slow at both ends: `3t^2 - 2t^3`.
    Smoothstep,
}

impl Easing {
    /// Eases progress `t`, clamped to `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            // The raw curve stops just short of 1.
            Self::ExponentialOut if t >= 1.0 => 1.0,
            Self::ExponentialOut => 1.0 - (-10.0 * t).exp2(),
            Self::Smoothstep => t * t * (3.0 - 2.0 * t),
        }
    }

    /// Scale between `from` and `to` at progress `t`.
    #[must_use]
    pub fn lerp(self, from: f32, to: f32, t: f32) -> f32 {
        from + (to - from) * self.apply(t)
    }
}
