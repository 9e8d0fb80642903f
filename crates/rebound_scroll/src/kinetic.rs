//! Kinetic motion engine
//!
//! Advances the store once per frame after a gesture ends. Each axis is in one
//! of two motions:
//!
//! - **Decelerate**: free flight with friction. Running into a border turns
//!   into overshoot, which an inverse acceleration pulls back.
//! - **Snap-back**: an axis that was already overshot when the gesture ended
//!   follows the closed-form [`SnapBack`] curve to the border.
//!
//! The session ends once every axis is at rest with zero overshoot.

use rebound_animation::SnapBack;
use rebound_core::{Axis, Vec2};

use crate::config::PhysicsConfig;
use crate::store::ScrollStore;

/// What one axis is doing during a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisMotion {
    Rest,
    /// Free flight at `velocity` units/ms
    Decelerate { velocity: f64 },
    SnapBack(SnapBack),
}

impl AxisMotion {
    pub fn is_rest(&self) -> bool {
        matches!(self, AxisMotion::Rest)
    }
}

/// Outcome of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// Overshoot on some axis changed this frame
    pub overshoot_changed: bool,
    /// The session reached rest and was dropped
    pub finished: bool,
}

#[derive(Debug, Clone, Copy)]
struct KineticSession {
    motions: [AxisMotion; 2],
    start_ms: f64,
    last_tick_ms: f64,
    /// Friction share per axis: `[sin, cos]` of the release angle
    friction_share: [f64; 2],
}

/// Per-frame deceleration and snap-back
pub struct KineticEngine {
    physics: PhysicsConfig,
    allow_overshoot: bool,
    snap_to_border: bool,
    session: Option<KineticSession>,
}

impl KineticEngine {
    pub fn new(physics: PhysicsConfig, allow_overshoot: bool, snap_to_border: bool) -> Self {
        Self {
            physics,
            allow_overshoot,
            snap_to_border,
            session: None,
        }
    }

    pub fn set_physics(&mut self, physics: PhysicsConfig) {
        self.physics = physics;
    }

    pub fn set_allow_overshoot(&mut self, allow_overshoot: bool) {
        self.allow_overshoot = allow_overshoot;
    }

    pub fn set_snap_to_border(&mut self, snap_to_border: bool) {
        self.snap_to_border = snap_to_border;
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Current motion of an axis, `Rest` when idle
    pub fn motion(&self, axis: Axis) -> AxisMotion {
        self.session
            .map(|session| session.motions[axis.index()])
            .unwrap_or(AxisMotion::Rest)
    }

    /// Time the running session started
    pub fn start_time(&self) -> Option<f64> {
        self.session.map(|session| session.start_ms)
    }

    /// Start a session from the release state, replacing any running one
    ///
    /// Overshot axes snap back; the others decelerate from `velocity`.
    /// Returns false when every axis is already at rest.
    pub fn start(&mut self, store: &ScrollStore, velocity: Vec2, now_ms: f64) -> bool {
        let mut motions = [AxisMotion::Rest; 2];
        for axis in Axis::ALL {
            if !store.is_visible(axis) {
                continue;
            }
            let overshoot = store.overshoot(axis);
            let axis_velocity = velocity.along(axis);
            motions[axis.index()] = if overshoot != 0.0 {
                AxisMotion::SnapBack(SnapBack::new(
                    overshoot,
                    axis_velocity,
                    now_ms,
                    self.physics.spring,
                ))
            } else if axis_velocity != 0.0 {
                AxisMotion::Decelerate {
                    velocity: axis_velocity,
                }
            } else {
                AxisMotion::Rest
            };
        }

        if motions.iter().all(AxisMotion::is_rest) {
            self.session = None;
            return false;
        }

        let angle = velocity.x.abs().atan2(velocity.y.abs());
        tracing::debug!(
            "kinetic session: x={:?} y={:?}",
            motions[0],
            motions[1]
        );
        self.session = Some(KineticSession {
            motions,
            start_ms: now_ms,
            last_tick_ms: now_ms,
            friction_share: [angle.sin(), angle.cos()],
        });
        true
    }

    /// Snap back whatever is overshot, dropping any velocity
    pub fn settle(&mut self, store: &ScrollStore, now_ms: f64) -> bool {
        self.start(store, Vec2::ZERO, now_ms)
    }

    pub fn cancel(&mut self) {
        if self.session.take().is_some() {
            tracing::debug!("kinetic session cancelled");
        }
    }

    /// Put one axis at rest, ending the session if nothing else moves
    pub fn stop_axis(&mut self, axis: Axis) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.motions[axis.index()] = AxisMotion::Rest;
        if session.motions.iter().all(AxisMotion::is_rest) {
            self.cancel();
        }
    }

    /// Advance every axis to `now_ms`
    pub fn tick(&mut self, store: &mut ScrollStore, now_ms: f64) -> TickOutcome {
        let Some(mut session) = self.session else {
            return TickOutcome {
                overshoot_changed: false,
                finished: true,
            };
        };

        let elapsed = (now_ms - session.last_tick_ms).max(0.0);
        session.last_tick_ms = now_ms;

        let mut overshoot_changed = false;
        for axis in Axis::ALL {
            let old_overshoot = store.overshoot(axis);
            let motion = session.motions[axis.index()];
            session.motions[axis.index()] = if !store.is_visible(axis) {
                AxisMotion::Rest
            } else {
                match motion {
                    AxisMotion::Rest => AxisMotion::Rest,
                    AxisMotion::Decelerate { velocity } => self.decelerate(
                        store,
                        axis,
                        velocity,
                        elapsed,
                        session.friction_share[axis.index()],
                    ),
                    AxisMotion::SnapBack(snap) => self.snap_back(store, axis, snap, now_ms),
                }
            };
            overshoot_changed |= store.overshoot(axis) != old_overshoot;
        }

        let finished = session.motions.iter().all(AxisMotion::is_rest);
        tracing::trace!(
            "kinetic tick +{:.1}ms: value=({:.2}, {:.2}) overshoot=({:.2}, {:.2})",
            elapsed,
            store.unclamped_value(Axis::Horizontal),
            store.unclamped_value(Axis::Vertical),
            store.overshoot(Axis::Horizontal),
            store.overshoot(Axis::Vertical)
        );

        if finished {
            tracing::debug!("kinetic session at rest");
            self.session = None;
        } else {
            self.session = Some(session);
        }

        TickOutcome {
            overshoot_changed,
            finished,
        }
    }

    fn decelerate(
        &self,
        store: &mut ScrollStore,
        axis: Axis,
        mut velocity: f64,
        elapsed: f64,
        friction_share: f64,
    ) -> AxisMotion {
        let old_overshoot = store.overshoot(axis);
        let target = store.unclamped_value(axis) + velocity * elapsed;
        if store.set_value(axis, target, self.allow_overshoot, self.snap_to_border) {
            velocity = 0.0;
        }

        let overshoot = store.overshoot(axis);
        if overshoot == 0.0 {
            if old_overshoot != 0.0 {
                // back inside after a bounce
                velocity = 0.0;
            } else {
                let friction = self.physics.friction_deceleration * elapsed * friction_share;
                velocity = if velocity > 0.0 {
                    (velocity - friction).max(0.0)
                } else {
                    (velocity + friction).min(0.0)
                };
            }
        } else {
            let pull = self.physics.overshoot_inverse_acceleration * elapsed;
            velocity -= overshoot.signum() * pull;
        }

        if velocity == 0.0 && overshoot == 0.0 {
            AxisMotion::Rest
        } else {
            AxisMotion::Decelerate { velocity }
        }
    }

    fn snap_back(
        &self,
        store: &mut ScrollStore,
        axis: Axis,
        snap: SnapBack,
        now_ms: f64,
    ) -> AxisMotion {
        if snap.is_settled(now_ms, self.physics.rest_threshold) {
            let rest = store.value(axis);
            store.set_value(axis, rest, false, false);
            return AxisMotion::Rest;
        }

        let old_overshoot = store.overshoot(axis);
        let target = store.unclamped_value(axis) + (snap.offset_at(now_ms) - old_overshoot);
        store.set_value(axis, target, true, false);

        if store.overshoot(axis) == 0.0 {
            AxisMotion::Rest
        } else {
            AxisMotion::SnapBack(snap)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 1000.0 / 60.0;

    fn store_1000() -> ScrollStore {
        let mut store = ScrollStore::new(50.0);
        store.set_bounds(Axis::Vertical, 0.0, 1000.0, 200.0);
        store.set_value(Axis::Vertical, 400.0, false, false);
        store
    }

    fn engine() -> KineticEngine {
        KineticEngine::new(PhysicsConfig::default(), true, true)
    }

    fn run(engine: &mut KineticEngine, store: &mut ScrollStore, mut now: f64) -> (usize, f64) {
        let mut ticks = 0;
        while engine.is_active() {
            now += FRAME;
            ticks += 1;
            engine.tick(store, now);
            assert!(ticks < 10_000, "session never settled");
        }
        (ticks, now)
    }

    #[test]
    fn test_start_picks_mode() {
        let mut store = store_1000();
        let mut engine = engine();

        assert!(engine.start(&store, Vec2::new(0.0, 0.625), 0.0));
        assert!(matches!(
            engine.motion(Axis::Vertical),
            AxisMotion::Decelerate { .. }
        ));
        // horizontal axis has nothing to scroll
        assert_eq!(engine.motion(Axis::Horizontal), AxisMotion::Rest);

        store.set_value(Axis::Vertical, -30.0, true, false);
        assert!(engine.start(&store, Vec2::new(0.0, 0.625), 0.0));
        assert!(matches!(
            engine.motion(Axis::Vertical),
            AxisMotion::SnapBack(_)
        ));
    }

    #[test]
    fn test_nothing_to_do() {
        let store = store_1000();
        let mut engine = engine();
        assert!(!engine.start(&store, Vec2::ZERO, 0.0));
        assert!(!engine.is_active());
    }

    #[test]
    fn test_deceleration_comes_to_rest() {
        let mut store = store_1000();
        let mut engine = engine();
        engine.start(&store, Vec2::new(0.0, 0.625), 0.0);

        let (ticks, _) = run(&mut engine, &mut store, 0.0);
        let value = store.value(Axis::Vertical);
        assert!(value > 400.0);
        assert_eq!(store.overshoot(Axis::Vertical), 0.0);
        // 0.625 / (0.003 * 16.67) frames of friction, plus the last one
        assert!(ticks <= 14, "ticks = {}", ticks);
    }

    #[test]
    fn test_deceleration_friction_never_reverses() {
        let mut store = store_1000();
        let mut engine = engine();
        engine.start(&store, Vec2::new(0.0, -0.2), 0.0);

        let mut previous = store.value(Axis::Vertical);
        let mut now = 0.0;
        while engine.is_active() {
            now += FRAME;
            engine.tick(&mut store, now);
            let value = store.value(Axis::Vertical);
            assert!(value <= previous);
            previous = value;
        }
    }

    #[test]
    fn test_flick_into_border_bounces_back() {
        let mut store = store_1000();
        store.set_value(Axis::Vertical, 780.0, false, false);
        let mut engine = engine();
        engine.start(&store, Vec2::new(0.0, 3.0), 0.0);

        let mut max_overshoot: f64 = 0.0;
        let mut now = 0.0;
        while engine.is_active() {
            now += FRAME;
            let outcome = engine.tick(&mut store, now);
            max_overshoot = max_overshoot.max(store.overshoot(Axis::Vertical));
            if outcome.finished {
                break;
            }
            assert!(now < 60_000.0);
        }

        assert!(max_overshoot > 0.0 && max_overshoot <= 50.0);
        assert_eq!(store.overshoot(Axis::Vertical), 0.0);
        // snap-to-border lands exactly on the edge
        assert_eq!(store.value(Axis::Vertical), 800.0);
    }

    #[test]
    fn test_no_overshoot_stops_at_border() {
        let mut store = store_1000();
        store.set_value(Axis::Vertical, 780.0, false, false);
        let mut engine = KineticEngine::new(PhysicsConfig::default(), false, true);
        engine.start(&store, Vec2::new(0.0, 3.0), 0.0);

        let (ticks, _) = run(&mut engine, &mut store, 0.0);
        assert_eq!(ticks, 1);
        assert_eq!(store.value(Axis::Vertical), 800.0);
        assert_eq!(store.unclamped_value(Axis::Vertical), 800.0);
    }

    #[test]
    fn test_snap_back_converges_in_settle_time() {
        let mut store = store_1000();
        store.set_value(Axis::Vertical, -50.0, true, false);
        let mut engine = engine();
        engine.start(&store, Vec2::ZERO, 0.0);

        let settle = SnapBack::new(-50.0, 0.0, 0.0, PhysicsConfig::default().spring)
            .settle_time_ms(1.0);
        let (_, end) = run(&mut engine, &mut store, 0.0);

        assert_eq!(store.overshoot(Axis::Vertical), 0.0);
        assert_eq!(store.value(Axis::Vertical), 0.0);
        assert!((end - settle).abs() <= FRAME, "end {} settle {}", end, settle);
    }

    #[test]
    fn test_snap_back_is_monotonic_without_velocity() {
        let mut store = store_1000();
        store.set_value(Axis::Vertical, 840.0, true, false);
        let mut engine = engine();
        engine.start(&store, Vec2::ZERO, 0.0);

        let mut previous = store.overshoot(Axis::Vertical);
        let mut now = 0.0;
        while engine.is_active() {
            now += FRAME;
            engine.tick(&mut store, now);
            let overshoot = store.overshoot(Axis::Vertical);
            assert!(overshoot <= previous && overshoot >= 0.0);
            previous = overshoot;
        }
        assert_eq!(store.value(Axis::Vertical), 800.0);
    }

    #[test]
    fn test_mixed_axes() {
        let mut store = store_1000();
        store.set_bounds(Axis::Horizontal, 0.0, 2000.0, 300.0);
        store.set_value(Axis::Horizontal, 500.0, false, false);
        store.set_value(Axis::Vertical, -20.0, true, false);

        let mut engine = engine();
        engine.start(&store, Vec2::new(1.0, 0.5), 0.0);
        assert!(matches!(
            engine.motion(Axis::Horizontal),
            AxisMotion::Decelerate { .. }
        ));
        assert!(matches!(
            engine.motion(Axis::Vertical),
            AxisMotion::SnapBack(_)
        ));

        run(&mut engine, &mut store, 0.0);
        assert!(store.value(Axis::Horizontal) > 500.0);
        assert_eq!(store.value(Axis::Vertical), 0.0);
        assert!(!store.is_overshot());
    }

    #[test]
    fn test_cancel_and_restart() {
        let mut store = store_1000();
        let mut engine = engine();
        engine.start(&store, Vec2::new(0.0, 1.0), 0.0);
        engine.tick(&mut store, FRAME);
        engine.cancel();
        assert!(!engine.is_active());

        let outcome = engine.tick(&mut store, 2.0 * FRAME);
        assert!(outcome.finished);

        engine.start(&store, Vec2::new(0.0, -1.0), 100.0);
        assert_eq!(engine.start_time(), Some(100.0));
    }

    #[test]
    fn test_stop_axis() {
        let mut store = store_1000();
        store.set_bounds(Axis::Horizontal, 0.0, 2000.0, 300.0);
        let mut engine = engine();
        engine.start(&store, Vec2::new(1.0, 1.0), 0.0);

        engine.stop_axis(Axis::Vertical);
        assert!(engine.is_active());
        assert_eq!(engine.motion(Axis::Vertical), AxisMotion::Rest);

        engine.stop_axis(Axis::Horizontal);
        assert!(!engine.is_active());
    }
}
