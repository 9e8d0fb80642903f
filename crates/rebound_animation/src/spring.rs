//! Snap-back spring
//!
//! Closed-form damped return of an overshot scroll position:
//!
//! ```text
//! delta(t) = (overshoot_0 + velocity_0 * t * amplitude) * exp(-t * stiffness / period)
//! ```
//!
//! with `t` in seconds and `velocity_0` in units per millisecond. Being
//! closed-form, the curve does not drift with frame timing.

use serde::{Deserialize, Serialize};

/// Time step used when searching for the settle time
const SETTLE_SEARCH_STEP_MS: f64 = 1.0;
/// Upper bound on the settle time search
const SETTLE_SEARCH_LIMIT_MS: f64 = 10_000.0;

/// Configuration for the snap-back curve
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    /// Decay rate (default: 10.0)
    pub stiffness: f64,
    /// Time scale the decay is divided by (default: 1.0)
    pub period: f64,
    /// Weight of the release velocity (default: 1000.0)
    pub amplitude: f64,
}

impl SpringConfig {
    /// Settles a 50 unit overshoot in about 390ms
    pub const DEFAULT: Self = Self {
        stiffness: 10.0,
        period: 1.0,
        amplitude: 1000.0,
    };

    /// Quick return, about 260ms for 50 units
    pub const SNAPPY: Self = Self {
        stiffness: 15.0,
        period: 1.0,
        amplitude: 1000.0,
    };

    /// Slow return, about 650ms for 50 units
    pub const GENTLE: Self = Self {
        stiffness: 6.0,
        period: 1.0,
        amplitude: 1000.0,
    };

    /// Decay exponent per second
    pub fn decay_rate(&self) -> f64 {
        self.stiffness / self.period
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One axis of a snap-back session
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapBack {
    /// Signed overshoot when the session started
    pub overshoot: f64,
    /// Release velocity in units/ms
    pub velocity: f64,
    pub start_ms: f64,
    pub config: SpringConfig,
}

impl SnapBack {
    pub fn new(overshoot: f64, velocity: f64, start_ms: f64, config: SpringConfig) -> Self {
        Self {
            overshoot,
            velocity,
            start_ms,
            config,
        }
    }

    /// Signed overshoot the curve prescribes at `now_ms`
    pub fn offset_at(&self, now_ms: f64) -> f64 {
        let t = ((now_ms - self.start_ms) / 1000.0).max(0.0);
        let damp = (-t * self.config.decay_rate()).exp();
        (self.overshoot + self.velocity * t * self.config.amplitude) * damp
    }

    /// Whether the curve has come to rest at `now_ms`
    ///
    /// Rest means the offset fell below `threshold` or crossed to the other
    /// side of the border it started on.
    pub fn is_settled(&self, now_ms: f64, threshold: f64) -> bool {
        let offset = self.offset_at(now_ms);
        offset.abs() < threshold || offset * self.overshoot < 0.0
    }

    /// Milliseconds from start until the curve settles
    pub fn settle_time_ms(&self, threshold: f64) -> f64 {
        let mut elapsed = 0.0;
        while elapsed < SETTLE_SEARCH_LIMIT_MS {
            if self.is_settled(self.start_ms + elapsed, threshold) {
                return elapsed;
            }
            elapsed += SETTLE_SEARCH_STEP_MS;
        }
        SETTLE_SEARCH_LIMIT_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_starts_at_overshoot() {
        let snap = SnapBack::new(50.0, 0.0, 100.0, SpringConfig::default());
        assert_eq!(snap.offset_at(100.0), 50.0);
        // time before start is treated as the start
        assert_eq!(snap.offset_at(0.0), 50.0);
    }

    #[test]
    fn test_default_settle_time() {
        let snap = SnapBack::new(50.0, 0.0, 0.0, SpringConfig::default());
        let expected = 50f64.ln() / 10.0 * 1000.0;
        let settle = snap.settle_time_ms(1.0);
        assert!((settle - expected).abs() <= 1.0, "settle = {}", settle);
        assert!(settle > 300.0 && settle < 500.0);
    }

    #[test]
    fn test_presets_order() {
        let settle = |config| SnapBack::new(50.0, 0.0, 0.0, config).settle_time_ms(1.0);
        assert!(settle(SpringConfig::SNAPPY) < settle(SpringConfig::DEFAULT));
        assert!(settle(SpringConfig::DEFAULT) < settle(SpringConfig::GENTLE));
    }

    #[test]
    fn test_velocity_toward_border_settles_on_crossing() {
        // released while flicking back toward the valid range
        let snap = SnapBack::new(20.0, -2.0, 0.0, SpringConfig::default());
        assert!(snap.offset_at(20.0) < 0.0);
        assert!(snap.is_settled(20.0, 1.0));
    }

    #[test]
    fn test_velocity_away_from_border_grows_first() {
        let snap = SnapBack::new(10.0, 0.5, 0.0, SpringConfig::default());
        assert!(snap.offset_at(50.0) > 10.0);
        assert!(snap.settle_time_ms(1.0) < SETTLE_SEARCH_LIMIT_MS);
    }
}
