//! Gesture tracking
//!
//! Classifies a press/motion/release sequence as either a click (handed back
//! to the content) or a drag (scrolls the viewport), and estimates the
//! release velocity from the most recent motion samples.

use rebound_core::events::event_types;
use rebound_core::{EventType, Point, PointerEvent, StateTransitions, Vec2};

use crate::config::GestureConfig;

// ============================================================================
// Gesture Phase
// ============================================================================

/// Phase of the current pointer sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GesturePhase {
    /// No press being tracked
    #[default]
    Idle,
    /// Pressed, drag threshold not yet crossed
    Pressed,
    /// Pointer moved past the threshold, motion scrolls
    Dragging,
}

impl StateTransitions for GesturePhase {
    fn on_event(&self, event: EventType) -> Option<Self> {
        use event_types::*;
        match (self, event) {
            (GesturePhase::Idle, POINTER_DOWN) => Some(GesturePhase::Pressed),
            (GesturePhase::Pressed, DRAG) => Some(GesturePhase::Dragging),
            (GesturePhase::Pressed, POINTER_UP) | (GesturePhase::Pressed, TIMEOUT) => {
                Some(GesturePhase::Idle)
            }
            (GesturePhase::Dragging, POINTER_UP) => Some(GesturePhase::Idle),
            (_, GRAB_BROKEN) => Some(GesturePhase::Idle),
            _ => None,
        }
    }
}

// ============================================================================
// Velocity Estimation
// ============================================================================

/// Instantaneous velocity from consecutive samples
///
/// Velocity is `(previous - current) / dt` in units per millisecond, so a
/// pointer moving up yields a positive velocity (the viewport scrolls down).
/// It is only recomputed when the pointer moved or sat still longer than the
/// still threshold, and never across samples closer than the minimum
/// interval.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    last: Option<(Point, f64)>,
    velocity: Vec2,
    still_threshold_ms: f64,
    min_interval_ms: f64,
}

impl VelocityTracker {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            last: None,
            velocity: Vec2::ZERO,
            still_threshold_ms: config.still_threshold_ms,
            min_interval_ms: config.min_sample_interval_ms,
        }
    }

    /// Start a new sample sequence at `point`
    pub fn reset(&mut self, point: Point, time_ms: f64) {
        self.last = Some((point, time_ms));
        self.velocity = Vec2::ZERO;
    }

    /// Forget all samples
    pub fn clear(&mut self) {
        self.last = None;
        self.velocity = Vec2::ZERO;
    }

    /// Most recent sample position
    pub fn last_point(&self) -> Option<Point> {
        self.last.map(|(point, _)| point)
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Record a pointer position and return the updated estimate
    pub fn sample(&mut self, point: Point, time_ms: f64) -> Vec2 {
        if let Some((previous, previous_time)) = self.last {
            let dt = time_ms - previous_time;
            let moved = point != previous;
            if (moved || dt > self.still_threshold_ms) && dt >= self.min_interval_ms {
                self.velocity = Vec2::new((previous.x - point.x) / dt, (previous.y - point.y) / dt);
            } else {
                tracing::trace!("velocity held (dt={:.2}ms, moved={})", dt, moved);
            }
        }
        self.last = Some((point, time_ms));
        self.velocity
    }

    /// Record a scroll delta as if the pointer had moved by `-delta`
    pub fn sample_delta(&mut self, delta: Vec2, time_ms: f64) -> Vec2 {
        let origin = self.last_point().unwrap_or(Point::ZERO);
        if self.last.is_none() {
            self.last = Some((origin, time_ms));
            return self.velocity;
        }
        self.sample(Point::new(origin.x - delta.x, origin.y - delta.y), time_ms)
    }
}

// ============================================================================
// Gesture Tracker
// ============================================================================

/// Result of a motion sample while pressed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureMotion {
    /// Still within the drag threshold
    Pending,
    /// Scroll by `delta`; `started` is set on the sample that crossed the threshold
    Drag { delta: Vec2, started: bool },
}

/// Result of a release
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureRelease {
    /// Released before the threshold, carrying the press to replay if captured
    Click { captured: Option<PointerEvent> },
    /// Released after dragging
    Fling { velocity: Vec2 },
}

/// Per-sequence press/drag state
pub struct GestureTracker {
    config: GestureConfig,
    phase: GesturePhase,
    origin: Point,
    captured_press: Option<PointerEvent>,
    /// A press within `bypass_radius` of this point is left to the content
    bypass_point: Option<Point>,
    velocity: VelocityTracker,
}

impl GestureTracker {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            velocity: VelocityTracker::new(&config),
            config,
            phase: GesturePhase::Idle,
            origin: Point::ZERO,
            captured_press: None,
            bypass_point: None,
        }
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == GesturePhase::Dragging
    }

    pub fn captured_press(&self) -> Option<&PointerEvent> {
        self.captured_press.as_ref()
    }

    pub fn bypass_point(&self) -> Option<Point> {
        self.bypass_point
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity.velocity()
    }

    /// Consume the bypass point if `point` falls within its radius
    pub fn take_bypass(&mut self, point: Point) -> bool {
        let radius = self.config.bypass_radius;
        match self.bypass_point {
            Some(bypass)
                if (point.x - bypass.x).abs() < radius && (point.y - bypass.y).abs() < radius =>
            {
                self.bypass_point = None;
                tracing::debug!("press at {:?} bypasses capture", point);
                true
            }
            _ => false,
        }
    }

    pub fn set_bypass_point(&mut self, point: Option<Point>) {
        self.bypass_point = point;
    }

    /// Start tracking a press
    ///
    /// The press point doubles as the bypass point until a drag starts, so a
    /// quick second click lands on the content.
    pub fn press(&mut self, event: &PointerEvent, capture: bool) {
        self.phase = GesturePhase::Idle;
        self.phase.apply(event_types::POINTER_DOWN);
        self.origin = event.root;
        self.bypass_point = Some(event.root);
        self.captured_press = capture.then_some(*event);
        self.velocity.reset(event.root, event.time_ms);
    }

    /// Whether `point` is past the drag threshold on either axis
    pub fn exceeds_threshold(&self, point: Point) -> bool {
        let threshold = self.config.drag_threshold;
        (point.x - self.origin.x).abs() > threshold || (point.y - self.origin.y).abs() > threshold
    }

    /// Feed a motion sample; `None` when no press is being tracked
    pub fn motion(&mut self, point: Point, time_ms: f64) -> Option<GestureMotion> {
        let started = match self.phase {
            GesturePhase::Idle => return None,
            GesturePhase::Pressed => {
                if !self.exceeds_threshold(point) {
                    return Some(GestureMotion::Pending);
                }
                self.phase.apply(event_types::DRAG);
                self.bypass_point = None;
                self.captured_press = None;
                tracing::debug!("drag started at {:?}", point);
                true
            }
            GesturePhase::Dragging => false,
        };

        let last = self.velocity.last_point().unwrap_or(self.origin);
        let delta = Vec2::new(last.x - point.x, last.y - point.y);
        self.velocity.sample(point, time_ms);
        Some(GestureMotion::Drag { delta, started })
    }

    /// Finish the sequence; `None` when no press is being tracked
    pub fn release(&mut self, point: Point, time_ms: f64) -> Option<GestureRelease> {
        match self.phase {
            GesturePhase::Idle => None,
            GesturePhase::Pressed => {
                self.phase.apply(event_types::POINTER_UP);
                Some(GestureRelease::Click {
                    captured: self.captured_press.take(),
                })
            }
            GesturePhase::Dragging => {
                self.phase.apply(event_types::POINTER_UP);
                self.captured_press = None;
                let velocity = self.velocity.sample(point, time_ms);
                Some(GestureRelease::Fling { velocity })
            }
        }
    }

    /// The captured press waited too long; hand it back if still pending
    pub fn timeout(&mut self) -> Option<PointerEvent> {
        if self.phase.apply(event_types::TIMEOUT) {
            tracing::debug!("release timeout, replaying press");
            return self.captured_press.take();
        }
        None
    }

    /// Drop all sequence state after losing the pointer grab
    pub fn grab_broken(&mut self) {
        self.phase.apply(event_types::GRAB_BROKEN);
        self.captured_press = None;
        self.bypass_point = None;
        self.velocity.clear();
    }

    /// Start sampling a trackpad gesture
    pub fn begin_scroll(&mut self, time_ms: f64) {
        self.velocity.reset(Point::ZERO, time_ms);
    }

    /// Sample a trackpad delta, returning the updated velocity
    pub fn sample_scroll(&mut self, delta: Vec2, time_ms: f64) -> Vec2 {
        self.velocity.sample_delta(delta, time_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> GestureTracker {
        GestureTracker::new(GestureConfig::default())
    }

    #[test]
    fn test_phase_transitions() {
        use event_types::*;
        assert_eq!(
            GesturePhase::Idle.on_event(POINTER_DOWN),
            Some(GesturePhase::Pressed)
        );
        assert_eq!(
            GesturePhase::Pressed.on_event(DRAG),
            Some(GesturePhase::Dragging)
        );
        assert_eq!(GesturePhase::Dragging.on_event(DRAG), None);
        assert_eq!(GesturePhase::Dragging.on_event(TIMEOUT), None);
        assert_eq!(
            GesturePhase::Dragging.on_event(GRAB_BROKEN),
            Some(GesturePhase::Idle)
        );
    }

    #[test]
    fn test_velocity_from_two_samples() {
        let mut velocity = VelocityTracker::new(&GestureConfig::default());
        velocity.reset(Point::new(0.0, 0.0), 0.0);
        let v = velocity.sample(Point::new(-10.0, 0.0), 16.0);
        assert!((v.x - 0.625).abs() < 1e-12);
        assert_eq!(v.y, 0.0);
    }

    #[test]
    fn test_velocity_held_for_duplicate_events() {
        let mut velocity = VelocityTracker::new(&GestureConfig::default());
        velocity.reset(Point::new(0.0, 100.0), 0.0);
        velocity.sample(Point::new(0.0, 80.0), 10.0);

        // same timestamp: no division by zero, estimate kept
        let v = velocity.sample(Point::new(0.0, 70.0), 10.0);
        assert_eq!(v, Vec2::new(0.0, 2.0));

        // stationary but recent: kept
        let v = velocity.sample(Point::new(0.0, 70.0), 30.0);
        assert_eq!(v, Vec2::new(0.0, 2.0));

        // stationary past the still threshold: decays to zero
        let v = velocity.sample(Point::new(0.0, 70.0), 100.0);
        assert_eq!(v, Vec2::ZERO);
    }

    #[test]
    fn test_scroll_delta_velocity() {
        let mut velocity = VelocityTracker::new(&GestureConfig::default());
        velocity.reset(Point::ZERO, 0.0);
        let v = velocity.sample_delta(Vec2::new(0.0, 8.0), 16.0);
        assert_eq!(v, Vec2::new(0.0, 0.5));
    }

    #[test]
    fn test_press_below_threshold_is_pending() {
        let mut tracker = tracker();
        tracker.press(&PointerEvent::press(Point::new(100.0, 100.0), 0.0), true);

        assert_eq!(
            tracker.motion(Point::new(104.0, 92.0), 5.0),
            Some(GestureMotion::Pending)
        );
        assert_eq!(tracker.phase(), GesturePhase::Pressed);
        assert!(tracker.captured_press().is_some());
    }

    #[test]
    fn test_drag_crossing_threshold() {
        let mut tracker = tracker();
        tracker.press(&PointerEvent::press(Point::new(100.0, 100.0), 0.0), true);

        let motion = tracker.motion(Point::new(100.0, 91.0), 10.0);
        assert_eq!(
            motion,
            Some(GestureMotion::Drag {
                delta: Vec2::new(0.0, 9.0),
                started: true
            })
        );
        assert!(tracker.is_dragging());
        assert!(tracker.captured_press().is_none());
        assert!(tracker.bypass_point().is_none());

        let motion = tracker.motion(Point::new(100.0, 81.0), 20.0);
        assert_eq!(
            motion,
            Some(GestureMotion::Drag {
                delta: Vec2::new(0.0, 10.0),
                started: false
            })
        );
    }

    #[test]
    fn test_click_returns_captured_press() {
        let mut tracker = tracker();
        let press = PointerEvent::press(Point::new(10.0, 10.0), 0.0);
        tracker.press(&press, true);

        let release = tracker.release(Point::new(10.0, 10.0), 50.0);
        assert_eq!(
            release,
            Some(GestureRelease::Click {
                captured: Some(press)
            })
        );
        assert_eq!(tracker.phase(), GesturePhase::Idle);
        // quick second click lands on the content
        assert!(tracker.take_bypass(Point::new(20.0, 5.0)));
        assert!(!tracker.take_bypass(Point::new(20.0, 5.0)));
    }

    #[test]
    fn test_fling_velocity() {
        let mut tracker = tracker();
        tracker.press(&PointerEvent::press(Point::new(0.0, 300.0), 0.0), false);
        tracker.motion(Point::new(0.0, 250.0), 16.0);
        tracker.motion(Point::new(0.0, 200.0), 32.0);

        match tracker.release(Point::new(0.0, 190.0), 36.0) {
            Some(GestureRelease::Fling { velocity }) => {
                assert!((velocity.y - 2.5).abs() < 1e-12);
            }
            other => panic!("expected fling, got {:?}", other),
        }
    }

    #[test]
    fn test_timeout_only_while_pressed() {
        let mut tracker = tracker();
        let press = PointerEvent::press(Point::new(10.0, 10.0), 0.0);
        tracker.press(&press, true);
        assert_eq!(tracker.timeout(), Some(press));
        assert_eq!(tracker.phase(), GesturePhase::Idle);
        assert_eq!(tracker.timeout(), None);
    }

    #[test]
    fn test_bypass_radius_is_strict() {
        let mut tracker = tracker();
        tracker.set_bypass_point(Some(Point::new(0.0, 0.0)));
        assert!(!tracker.take_bypass(Point::new(30.0, 0.0)));
        assert!(tracker.take_bypass(Point::new(29.0, -29.0)));
    }

    #[test]
    fn test_grab_broken_resets() {
        let mut tracker = tracker();
        tracker.press(&PointerEvent::press(Point::new(0.0, 0.0), 0.0), true);
        tracker.motion(Point::new(0.0, 40.0), 10.0);
        tracker.grab_broken();

        assert_eq!(tracker.phase(), GesturePhase::Idle);
        assert!(tracker.captured_press().is_none());
        assert_eq!(tracker.velocity(), Vec2::ZERO);
        assert_eq!(tracker.motion(Point::new(0.0, 50.0), 20.0), None);
    }
}
