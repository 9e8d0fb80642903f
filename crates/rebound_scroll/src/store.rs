//! Scroll position store
//!
//! One [`ScrollAxis`] per dimension. Each axis keeps the clamped `value` the
//! renderer reads and the `unclamped_value` the physics works with. The two
//! only differ while the axis is overshot.

use rebound_core::{Axis, Vec2};

/// Called with the new clamped value whenever it changes
pub type ValueCallback = Box<dyn FnMut(Axis, f64)>;
/// Called after bounds or page size change
pub type BoundsCallback = Box<dyn FnMut(Axis, &ScrollAxis)>;

/// One scrollable dimension
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAxis {
    pub lower: f64,
    pub upper: f64,
    pub page_size: f64,
    /// Position consumed by the renderer, always within bounds
    pub value: f64,
    /// Physical position, may sit past a border while overshot
    pub unclamped_value: f64,
}

impl Default for ScrollAxis {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl ScrollAxis {
    pub fn new(lower: f64, upper: f64, page_size: f64) -> Self {
        let lower = finite_or(lower, 0.0);
        Self {
            lower,
            upper: finite_or(upper, lower).max(lower),
            page_size: finite_or(page_size, 0.0).max(0.0),
            value: lower,
            unclamped_value: lower,
        }
    }

    /// Lowest in-bounds value
    pub fn min_value(&self) -> f64 {
        self.lower
    }

    /// Highest in-bounds value
    pub fn max_value(&self) -> f64 {
        (self.upper - self.page_size).max(self.lower)
    }

    /// Content extends past the viewport on this axis
    pub fn is_scrollable(&self) -> bool {
        self.upper - self.lower > self.page_size
    }

    /// Whether this axis shows a scrollbar and takes part in physics
    pub fn visible(&self) -> bool {
        self.is_scrollable()
    }

    /// Visible fraction of the content, `>= 1.0` when nothing scrolls
    pub fn ratio(&self) -> f64 {
        let range = self.upper - self.lower;
        if range <= 0.0 {
            return 1.0;
        }
        self.page_size / range
    }

    /// Signed distance of the unclamped value past the nearer border
    pub fn overshoot(&self) -> f64 {
        if !self.is_scrollable() {
            return 0.0;
        }
        if self.unclamped_value < self.lower {
            self.unclamped_value - self.lower
        } else if self.unclamped_value > self.max_value() {
            self.unclamped_value - self.max_value()
        } else {
            0.0
        }
    }

    fn clamp_in_bounds(&self, value: f64) -> f64 {
        value.clamp(self.min_value(), self.max_value())
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Both axes plus change observers
pub struct ScrollStore {
    axes: [ScrollAxis; 2],
    max_overshoot: f64,
    /// Bumped on every clamped value change
    revision: u64,
    on_value_changed: Option<ValueCallback>,
    on_bounds_changed: Option<BoundsCallback>,
}

impl ScrollStore {
    pub fn new(max_overshoot: f64) -> Self {
        Self {
            axes: [ScrollAxis::default(); 2],
            max_overshoot: max_overshoot.max(0.0),
            revision: 0,
            on_value_changed: None,
            on_bounds_changed: None,
        }
    }

    /// Register the value observer, replacing any previous one
    pub fn on_value_changed<F>(&mut self, callback: F)
    where
        F: FnMut(Axis, f64) + 'static,
    {
        self.on_value_changed = Some(Box::new(callback));
    }

    /// Register the bounds observer, replacing any previous one
    pub fn on_bounds_changed<F>(&mut self, callback: F)
    where
        F: FnMut(Axis, &ScrollAxis) + 'static,
    {
        self.on_bounds_changed = Some(Box::new(callback));
    }

    pub fn axis(&self, axis: Axis) -> &ScrollAxis {
        &self.axes[axis.index()]
    }

    pub fn value(&self, axis: Axis) -> f64 {
        self.axis(axis).value
    }

    pub fn unclamped_value(&self, axis: Axis) -> f64 {
        self.axis(axis).unclamped_value
    }

    pub fn overshoot(&self, axis: Axis) -> f64 {
        self.axis(axis).overshoot()
    }

    /// Overshoot of both axes as a vector
    pub fn overshoot_vec(&self) -> Vec2 {
        Vec2::new(
            self.overshoot(Axis::Horizontal),
            self.overshoot(Axis::Vertical),
        )
    }

    pub fn is_overshot(&self) -> bool {
        !self.overshoot_vec().is_zero()
    }

    pub fn is_visible(&self, axis: Axis) -> bool {
        self.axis(axis).visible()
    }

    /// At least one axis can scroll
    pub fn any_visible(&self) -> bool {
        Axis::ALL.iter().any(|&axis| self.is_visible(axis))
    }

    pub fn max_overshoot(&self) -> f64 {
        self.max_overshoot
    }

    pub fn set_max_overshoot(&mut self, max_overshoot: f64) {
        self.max_overshoot = max_overshoot.max(0.0);
    }

    /// Counter that changes whenever a clamped value changes
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Move an axis, returning whether the request had to be clamped
    ///
    /// With `snap_to_border`, a value re-entering bounds from an overshoot
    /// lands exactly on the border it crossed. With `allow_overshoot`, the
    /// unclamped value may travel `max_overshoot` past either border.
    pub fn set_value(
        &mut self,
        axis: Axis,
        raw_value: f64,
        allow_overshoot: bool,
        snap_to_border: bool,
    ) -> bool {
        if !raw_value.is_finite() {
            tracing::trace!("{:?}: ignoring non-finite value {}", axis, raw_value);
            return false;
        }

        let state = self.axes[axis.index()];
        if !state.is_scrollable() {
            self.store(axis, state.lower, state.lower);
            return raw_value != state.lower;
        }

        let (lo, hi) = (state.min_value(), state.max_value());
        let previous = state.unclamped_value;
        let mut value = raw_value;

        if snap_to_border {
            if previous < lo && value > lo {
                value = lo;
            } else if previous > hi && value < hi {
                value = hi;
            }
        }

        let (min, max) = if allow_overshoot {
            (lo - self.max_overshoot, hi + self.max_overshoot)
        } else {
            (lo, hi)
        };

        let unclamped = value.clamp(min, max);
        self.store(axis, unclamped, unclamped.clamp(lo, hi));

        unclamped != value
    }

    /// Adopt the clamped value as the physical position, dropping overshoot
    pub fn sync_unclamped(&mut self, axis: Axis) {
        let axis_state = &mut self.axes[axis.index()];
        axis_state.unclamped_value = axis_state.value;
    }

    /// Replace bounds and page size, pulling the position back in range
    ///
    /// Any overshoot is dropped.
    pub fn set_bounds(&mut self, axis: Axis, lower: f64, upper: f64, page_size: f64) {
        let old = self.axes[axis.index()];
        let next = ScrollAxis::new(lower, upper, page_size);
        let value = next.clamp_in_bounds(old.value);

        self.axes[axis.index()] = ScrollAxis {
            value: old.value,
            unclamped_value: value,
            ..next
        };
        tracing::debug!(
            "{:?} bounds: [{}, {}] page {} (scrollable: {})",
            axis,
            next.lower,
            next.upper,
            next.page_size,
            next.is_scrollable()
        );

        self.store(axis, value, value);
        if let Some(callback) = self.on_bounds_changed.as_mut() {
            callback(axis, &self.axes[axis.index()]);
        }
    }

    fn store(&mut self, axis: Axis, unclamped: f64, value: f64) {
        let axis_state = &mut self.axes[axis.index()];
        axis_state.unclamped_value = unclamped;
        if axis_state.value == value {
            return;
        }
        axis_state.value = value;
        self.revision = self.revision.wrapping_add(1);
        if let Some(callback) = self.on_value_changed.as_mut() {
            callback(axis, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn store_1000() -> ScrollStore {
        let mut store = ScrollStore::new(50.0);
        store.set_bounds(Axis::Vertical, 0.0, 1000.0, 200.0);
        store
    }

    #[test]
    fn test_clamps_without_overshoot() {
        let mut store = store_1000();
        assert!(store.set_value(Axis::Vertical, 900.0, false, false));
        assert_eq!(store.value(Axis::Vertical), 800.0);
        assert_eq!(store.overshoot(Axis::Vertical), 0.0);
    }

    #[test]
    fn test_overshoot_is_bounded() {
        let mut store = store_1000();
        assert!(store.set_value(Axis::Vertical, 900.0, true, false));
        assert_eq!(store.unclamped_value(Axis::Vertical), 850.0);
        assert_eq!(store.value(Axis::Vertical), 800.0);
        assert_eq!(store.overshoot(Axis::Vertical), 50.0);

        assert!(!store.set_value(Axis::Vertical, -20.0, true, false));
        assert_eq!(store.overshoot(Axis::Vertical), -20.0);
        assert_eq!(store.value(Axis::Vertical), 0.0);
    }

    #[test]
    fn test_snap_to_border_on_reentry() {
        let mut store = store_1000();
        store.set_value(Axis::Vertical, -30.0, true, false);

        // crossing back in from above the lower border lands on it
        assert!(!store.set_value(Axis::Vertical, 12.0, true, true));
        assert_eq!(store.unclamped_value(Axis::Vertical), 0.0);

        // repeating the request is a no-op
        let revision = store.revision();
        assert!(!store.set_value(Axis::Vertical, 0.0, true, true));
        assert_eq!(store.value(Axis::Vertical), 0.0);
        assert_eq!(store.revision(), revision);

        // upper border
        store.set_value(Axis::Vertical, 830.0, true, false);
        assert!(!store.set_value(Axis::Vertical, 700.0, true, true));
        assert_eq!(store.value(Axis::Vertical), 800.0);
    }

    #[test]
    fn test_snap_uses_lower_bound() {
        let mut store = ScrollStore::new(50.0);
        store.set_bounds(Axis::Horizontal, 100.0, 600.0, 100.0);
        store.set_value(Axis::Horizontal, 80.0, true, false);
        assert_eq!(store.overshoot(Axis::Horizontal), -20.0);

        store.set_value(Axis::Horizontal, 150.0, true, true);
        assert_eq!(store.value(Axis::Horizontal), 100.0);
    }

    #[test]
    fn test_without_snap_passes_through_border() {
        let mut store = store_1000();
        store.set_value(Axis::Vertical, -30.0, true, false);
        store.set_value(Axis::Vertical, 12.0, true, false);
        assert_eq!(store.value(Axis::Vertical), 12.0);
    }

    #[test]
    fn test_non_scrollable_axis() {
        let mut store = ScrollStore::new(50.0);
        store.set_bounds(Axis::Horizontal, 0.0, 300.0, 400.0);

        assert!(!store.is_visible(Axis::Horizontal));
        assert!(store.set_value(Axis::Horizontal, 120.0, true, false));
        assert_eq!(store.value(Axis::Horizontal), 0.0);
        assert_eq!(store.overshoot(Axis::Horizontal), 0.0);

        // page exactly equal to the range is not scrollable either
        store.set_bounds(Axis::Horizontal, 0.0, 400.0, 400.0);
        assert!(!store.is_visible(Axis::Horizontal));
    }

    #[test]
    fn test_clamp_invariant_over_many_moves() {
        let mut store = store_1000();
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let raw = (seed % 3000) as f64 - 1000.0;
            store.set_value(Axis::Vertical, raw, false, seed % 2 == 0);
            let value = store.value(Axis::Vertical);
            assert!((0.0..=800.0).contains(&value), "value {}", value);
            assert_eq!(store.unclamped_value(Axis::Vertical), value);
        }
    }

    #[test]
    fn test_overshoot_bound_over_many_moves() {
        let mut store = store_1000();
        let mut raw = -400.0;
        while raw < 1400.0 {
            store.set_value(Axis::Vertical, raw, true, false);
            let unclamped = store.unclamped_value(Axis::Vertical);
            assert!((-50.0..=850.0).contains(&unclamped));
            raw += 37.5;
        }
    }

    #[test]
    fn test_non_finite_input_is_ignored() {
        let mut store = store_1000();
        store.set_value(Axis::Vertical, 100.0, false, false);
        assert!(!store.set_value(Axis::Vertical, f64::NAN, true, false));
        assert_eq!(store.value(Axis::Vertical), 100.0);
    }

    #[test]
    fn test_value_callback_fires_on_change_only() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = store_1000();
        let sink = seen.clone();
        store.on_value_changed(move |axis, value| sink.borrow_mut().push((axis, value)));

        store.set_value(Axis::Vertical, 100.0, false, false);
        store.set_value(Axis::Vertical, 100.0, false, false);
        // overshoot alone does not move the clamped value
        store.set_value(Axis::Vertical, 0.0, false, false);
        store.set_value(Axis::Vertical, -10.0, true, false);

        assert_eq!(
            *seen.borrow(),
            vec![(Axis::Vertical, 100.0), (Axis::Vertical, 0.0)]
        );
    }

    #[test]
    fn test_set_bounds_reclamps_and_notifies() {
        let bounds = Rc::new(RefCell::new(Vec::new()));
        let mut store = store_1000();
        let sink = bounds.clone();
        store.on_bounds_changed(move |axis, state| sink.borrow_mut().push((axis, state.upper)));

        store.set_value(Axis::Vertical, 700.0, false, false);
        store.set_bounds(Axis::Vertical, 0.0, 500.0, 200.0);

        assert_eq!(store.value(Axis::Vertical), 300.0);
        assert_eq!(*bounds.borrow(), vec![(Axis::Vertical, 500.0)]);
    }

    #[test]
    fn test_ratio() {
        let axis = ScrollAxis::new(0.0, 1000.0, 200.0);
        assert!((axis.ratio() - 0.2).abs() < 1e-12);
        assert_eq!(ScrollAxis::default().ratio(), 1.0);
    }
}
