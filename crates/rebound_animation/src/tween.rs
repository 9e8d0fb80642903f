//! Fixed-duration value animation

use crate::easing::Easing;

/// Animates a value from `from` to `to` over `duration_ms`
///
/// A tween holds no clock of its own; it is sampled with the current time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub duration_ms: f64,
    pub easing: Easing,
    pub start_ms: f64,
}

impl Tween {
    pub fn new(from: f64, to: f64, duration_ms: f64, easing: Easing, start_ms: f64) -> Self {
        Self {
            from,
            to,
            duration_ms: duration_ms.max(0.0),
            easing,
            start_ms,
        }
    }

    /// Linear progress in `[0, 1]`
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Eased value at `now_ms`
    pub fn value_at(&self, now_ms: f64) -> f64 {
        let t = self.progress(now_ms);
        if t >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * self.easing.apply(t)
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_samples() {
        let tween = Tween::new(0.0, 0.5, 100.0, Easing::EaseInQuad, 1000.0);
        assert_eq!(tween.value_at(900.0), 0.0);
        assert!((tween.value_at(1050.0) - 0.125).abs() < 1e-12);
        assert_eq!(tween.value_at(1100.0), 0.5);
        assert!(tween.is_finished(1100.0));
        assert!(!tween.is_finished(1099.0));
    }

    #[test]
    fn test_zero_duration_lands_immediately() {
        let tween = Tween::new(0.2, 0.0, 0.0, Easing::EaseInQuad, 0.0);
        assert_eq!(tween.value_at(0.0), 0.0);
        assert!(tween.is_finished(0.0));
    }

    #[test]
    fn test_partial_start() {
        // fade-in resumed from a half-faded scrollbar
        let tween = Tween::new(0.2, 0.5, 100.0, Easing::EaseOutQuad, 0.0);
        assert_eq!(tween.value_at(0.0), 0.2);
        assert!(tween.value_at(50.0) > 0.35);
    }
}
