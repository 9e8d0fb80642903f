//! Easing functions for animations

/// Easing function type
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    /// Starts slow; used for fading out
    EaseInQuad,
    /// Starts fast; used for fading in
    EaseOutQuad,
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    ///
    /// Progress outside the unit interval is clamped first.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        for easing in [Easing::EaseInQuad, Easing::EaseOutQuad] {
            assert_eq!(easing.apply(0.0), 0.0, "{:?}", easing);
            assert_eq!(easing.apply(1.0), 1.0, "{:?}", easing);
        }
    }

    #[test]
    fn test_out_of_range_progress_is_clamped() {
        assert_eq!(Easing::EaseOutQuad.apply(-0.5), 0.0);
        assert_eq!(Easing::EaseInQuad.apply(3.0), 1.0);
    }

    #[test]
    fn test_quad_shapes() {
        // ease-in lags linear, ease-out leads it
        assert!((Easing::EaseInQuad.apply(0.5) - 0.25).abs() < 1e-12);
        assert!((Easing::EaseOutQuad.apply(0.5) - 0.75).abs() < 1e-12);
    }
}
