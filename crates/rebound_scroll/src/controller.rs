//! Scroll controller
//!
//! Wires the store, gesture tracker, kinetic engine and scrollbar animator to
//! a timer service. The host feeds it input events and fired timer ids; it
//! reports positions through the store observers and the output callbacks.
//!
//! # Event routing
//!
//! | Event | Goes to |
//! |-------|---------|
//! | press | visible scrollbar under the pointer, else the drag gesture |
//! | motion | scrollbar grab, else drag gesture, else scrollbar hover |
//! | release | scrollbar grab, else drag gesture |
//! | scroll | wheel steps or trackpad phases, bypassing the gesture |
//!
//! Value and bounds observers run synchronously from inside the store, while
//! the timer service is borrowed. Replay, overshoot and opacity callbacks are
//! queued and delivered once the service is released. No callback may call
//! back into the controller.

use std::rc::Rc;

use rebound_animation::{SharedTimers, TimerId, TimerService};
use rebound_core::{
    Axis, CrossingEvent, CrossingKind, PointerButton, PointerEvent, PointerKind, Rect,
    ScrollDelta, ScrollEvent, ScrollPhase, Vec2,
};
use smallvec::SmallVec;

use crate::config::ScrollConfig;
use crate::error::{Result, ScrollError};
use crate::fade::{FadePhase, ScrollbarAnimator};
use crate::gesture::{GestureMotion, GesturePhase, GestureRelease, GestureTracker};
use crate::kinetic::{AxisMotion, KineticEngine};
use crate::overshoot::OvershootWindow;
use crate::scrollbar::{thumb_drag_value, ScrollbarGrab, ScrollbarHitResult, ScrollbarRects};
use crate::store::{ScrollAxis, ScrollStore};

/// Whether the controller used an event or left it for the content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    Consumed,
    Ignored,
}

impl EventResponse {
    pub fn is_consumed(&self) -> bool {
        *self == EventResponse::Consumed
    }

    fn consumed_if(consumed: bool) -> Self {
        if consumed {
            EventResponse::Consumed
        } else {
            EventResponse::Ignored
        }
    }
}

/// Called with a captured press that should reach the content after all
pub type ReplayCallback = Box<dyn FnMut(&PointerEvent)>;
/// Called when the overshoot displacement changes
pub type OvershootCallback = Box<dyn FnMut(&OvershootWindow)>;
/// Called when the overlay scrollbar opacity changes
pub type OpacityCallback = Box<dyn FnMut(f64)>;

/// Kinetic scrolling controller for one scrollable viewport
pub struct ScrollController {
    config: ScrollConfig,
    timers: SharedTimers,
    store: ScrollStore,
    gesture: GestureTracker,
    kinetic: KineticEngine,
    scrollbars: ScrollbarAnimator,
    viewport: Rect,

    /// The drag gesture holds the pointer
    gesture_grab: bool,
    scrollbar_grab: Option<ScrollbarGrab>,

    frame_timer: Option<TimerId>,
    release_timer: Option<TimerId>,
    page_timer: Option<TimerId>,
    /// Snaps back a trackpad overshoot whose gesture stopped reporting
    scroll_timer: Option<TimerId>,

    last_revision: u64,
    last_overshoot: Vec2,
    last_opacity: f64,
    pending_replays: SmallVec<[PointerEvent; 1]>,

    on_replay: Option<ReplayCallback>,
    on_overshoot_changed: Option<OvershootCallback>,
    on_opacity_changed: Option<OpacityCallback>,
}

impl ScrollController {
    /// Create a controller with both axes empty
    ///
    /// Fails if `config` does not validate or `timers` no longer accepts timers.
    pub fn new(config: ScrollConfig, timers: SharedTimers) -> Result<Self> {
        config.validate()?;
        let running = timers
            .try_borrow()
            .map(|service| service.is_running())
            .unwrap_or(false);
        if !running {
            return Err(ScrollError::TimerUnavailable);
        }

        let store = ScrollStore::new(config.overshoot_allowance());
        let last_revision = store.revision();

        Ok(Self {
            gesture: GestureTracker::new(config.gesture),
            kinetic: KineticEngine::new(
                config.physics,
                config.enable_overshoot,
                config.snap_to_border_on_kinetic,
            ),
            scrollbars: ScrollbarAnimator::new(
                config.scrollbar,
                config.fade_out_delay_ms,
                config.physics.frame_interval_ms,
                config.overlay_scrollbars,
            ),
            config,
            timers,
            store,
            viewport: Rect::default(),
            gesture_grab: false,
            scrollbar_grab: None,
            frame_timer: None,
            release_timer: None,
            page_timer: None,
            scroll_timer: None,
            last_revision,
            last_overshoot: Vec2::ZERO,
            last_opacity: 0.0,
            pending_replays: SmallVec::new(),
            on_replay: None,
            on_overshoot_changed: None,
            on_opacity_changed: None,
        })
    }

    // =========================================================================
    // Callbacks
    // =========================================================================

    /// Observe clamped value changes
    pub fn on_value_changed<F>(&mut self, callback: F)
    where
        F: FnMut(Axis, f64) + 'static,
    {
        self.store.on_value_changed(callback);
    }

    /// Observe bounds changes
    pub fn on_bounds_changed<F>(&mut self, callback: F)
    where
        F: FnMut(Axis, &ScrollAxis) + 'static,
    {
        self.store.on_bounds_changed(callback);
    }

    /// Receive captured presses that turned out to be clicks
    pub fn on_replay<F>(&mut self, callback: F)
    where
        F: FnMut(&PointerEvent) + 'static,
    {
        self.on_replay = Some(Box::new(callback));
    }

    pub fn on_overshoot_changed<F>(&mut self, callback: F)
    where
        F: FnMut(&OvershootWindow) + 'static,
    {
        self.on_overshoot_changed = Some(Box::new(callback));
    }

    pub fn on_opacity_changed<F>(&mut self, callback: F)
    where
        F: FnMut(f64) + 'static,
    {
        self.on_opacity_changed = Some(Box::new(callback));
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    pub fn store(&self) -> &ScrollStore {
        &self.store
    }

    pub fn axis(&self, axis: Axis) -> &ScrollAxis {
        self.store.axis(axis)
    }

    pub fn value(&self, axis: Axis) -> f64 {
        self.store.value(axis)
    }

    pub fn overshoot(&self, axis: Axis) -> f64 {
        self.store.overshoot(axis)
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Overlay scrollbar opacity in `[0, max_opacity]`
    pub fn opacity(&self) -> f64 {
        self.scrollbars.opacity()
    }

    pub fn fade_phase(&self) -> FadePhase {
        self.scrollbars.phase()
    }

    /// Draw the scrollbar track background (latched while hovered)
    pub fn track_visible(&self) -> bool {
        self.scrollbars.track_visible()
    }

    pub fn gesture_phase(&self) -> GesturePhase {
        self.gesture.phase()
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    /// The controller holds the pointer (drag gesture or scrollbar)
    pub fn has_grab(&self) -> bool {
        self.gesture_grab || self.scrollbar_grab.is_some()
    }

    pub fn scrollbar_grab(&self) -> Option<ScrollbarGrab> {
        self.scrollbar_grab
    }

    /// A kinetic session is running
    pub fn is_animating(&self) -> bool {
        self.kinetic.is_active()
    }

    pub fn kinetic_motion(&self, axis: Axis) -> AxisMotion {
        self.kinetic.motion(axis)
    }

    pub fn scrollbar_rects(&self) -> ScrollbarRects {
        ScrollbarRects::compute(&self.store, self.viewport.size, &self.config.scrollbar)
    }

    /// Content placement for the current overshoot
    pub fn overshoot_window(&self) -> OvershootWindow {
        OvershootWindow::compute(self.viewport, self.store.overshoot_vec())
    }

    /// Whether `id` belongs to this controller
    pub fn owns_timer(&self, id: TimerId) -> bool {
        self.frame_timer == Some(id)
            || self.release_timer == Some(id)
            || self.page_timer == Some(id)
            || self.scroll_timer == Some(id)
            || self.scrollbars.owns(id)
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Replace an axis' bounds and page size
    pub fn set_bounds(&mut self, axis: Axis, lower: f64, upper: f64, page_size: f64) {
        self.with_timers(|this, timers| {
            this.store.set_bounds(axis, lower, upper, page_size);
            // the store dropped any overshoot, a snap-back would re-create it
            if matches!(this.kinetic.motion(axis), AxisMotion::SnapBack(_)) {
                this.kinetic.stop_axis(axis);
                if !this.kinetic.is_active() {
                    this.cancel_frame_timer(timers);
                }
            }
        });
    }

    /// Move an axis from outside any gesture; stops kinetic motion
    pub fn set_value(&mut self, axis: Axis, value: f64) {
        self.with_timers(|this, timers| {
            this.stop_kinetic(timers);
            this.store.set_value(axis, value, false, false);
            this.store.sync_unclamped(axis);
        });
    }

    /// Viewport rect in the host's coordinates; its size drives scrollbar layout
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
        self.flush();
    }

    pub fn set_kinetic_scrolling(&mut self, enabled: bool) {
        if self.config.kinetic_scrolling_enabled == enabled {
            return;
        }
        self.config.kinetic_scrolling_enabled = enabled;
        if enabled {
            return;
        }
        self.with_timers(|this, timers| {
            tracing::debug!("kinetic scrolling disabled");
            this.stop_kinetic(timers);
            this.end_gesture(timers);
            this.gesture.grab_broken();
            for axis in Axis::ALL {
                let value = this.store.value(axis);
                this.store.set_value(axis, value, false, false);
            }
        });
    }

    pub fn set_capture_button_press(&mut self, capture: bool) {
        self.config.capture_button_press = capture;
    }

    pub fn set_overlay_scrollbars(&mut self, enabled: bool) {
        self.config.overlay_scrollbars = enabled;
        self.with_timers(|this, timers| this.scrollbars.set_enabled(enabled, timers));
    }

    // =========================================================================
    // Input
    // =========================================================================

    pub fn handle_pointer(&mut self, event: &PointerEvent) -> EventResponse {
        self.with_timers(|this, timers| match event.kind {
            PointerKind::Press => this.press(event, timers),
            PointerKind::Motion => this.motion(event, timers),
            PointerKind::Release => this.release(event, timers),
        })
        .unwrap_or(EventResponse::Ignored)
    }

    pub fn handle_scroll(&mut self, event: &ScrollEvent) -> EventResponse {
        self.with_timers(|this, timers| this.scroll(event, timers))
            .unwrap_or(EventResponse::Ignored)
    }

    pub fn handle_crossing(&mut self, event: &CrossingEvent) -> EventResponse {
        self.with_timers(|this, timers| {
            if event.kind == CrossingKind::Leave
                && !this.gesture.is_dragging()
                && this.scrollbar_grab.is_none()
            {
                this.scrollbars.leave(timers);
            }
            // the content should not see crossings caused by our own drag
            EventResponse::consumed_if(this.gesture.is_dragging() && !event.from_grab)
        })
        .unwrap_or(EventResponse::Ignored)
    }

    /// Another component took the pointer; end any gesture and settle
    pub fn grab_broken(&mut self) {
        self.with_timers(|this, timers| {
            tracing::debug!("pointer grab broken");
            this.end_scrollbar_grab(timers);
            this.end_gesture(timers);
            this.gesture.grab_broken();
            this.stop_kinetic(timers);
            this.settle(timers);
        });
    }

    /// Handle a fired timer; false when `id` is not ours or is stale
    pub fn on_timer(&mut self, id: TimerId) -> bool {
        self.with_timers(|this, timers| this.dispatch_timer(id, timers))
            .unwrap_or(false)
    }

    // =========================================================================
    // Pointer
    // =========================================================================

    fn press(&mut self, event: &PointerEvent, timers: &mut dyn TimerService) -> EventResponse {
        if self.config.overlay_scrollbars && self.scrollbars.opacity() > 0.0 {
            let hit = self.scrollbar_rects().hit_test(event.local);
            if hit != ScrollbarHitResult::None {
                return self.scrollbar_press(event, hit, timers);
            }
        }

        if event.button != PointerButton::Primary
            || !self.config.kinetic_scrolling_enabled
            || !self.store.any_visible()
        {
            return EventResponse::Ignored;
        }
        if self.gesture.take_bypass(event.root) {
            return EventResponse::Ignored;
        }

        self.stop_kinetic(timers);
        let capture = self.config.capture_button_press;
        self.gesture.press(event, capture);
        self.gesture_grab = true;
        tracing::debug!("drag gesture grabbed pointer at {:?}", event.root);

        if capture {
            self.cancel_release_timer(timers);
            self.release_timer = Some(timers.start_once(self.config.gesture.release_timeout_ms));
        }
        EventResponse::consumed_if(capture)
    }

    fn motion(&mut self, event: &PointerEvent, timers: &mut dyn TimerService) -> EventResponse {
        if let Some(grab) = self.scrollbar_grab {
            if let ScrollbarGrab::Thumb { axis, grab_offset } = grab {
                self.drag_thumb(axis, grab_offset, event);
            }
            return EventResponse::Consumed;
        }

        if !self.gesture_grab {
            if self.config.overlay_scrollbars {
                let hit = self.scrollbar_rects().hit_test(event.local);
                let over_bar = hit != ScrollbarHitResult::None;
                self.scrollbars.hover(over_bar, timers);
            }
            return EventResponse::Ignored;
        }

        match self.gesture.motion(event.root, event.time_ms) {
            None => EventResponse::Ignored,
            Some(GestureMotion::Pending) => EventResponse::Consumed,
            Some(GestureMotion::Drag { delta, started }) => {
                if started {
                    self.cancel_release_timer(timers);
                }
                for axis in Axis::ALL {
                    let delta = delta.along(axis);
                    if delta == 0.0 || !self.store.is_visible(axis) {
                        continue;
                    }
                    let target = self.store.unclamped_value(axis) + delta;
                    self.store.set_value(
                        axis,
                        target,
                        self.config.enable_overshoot,
                        self.config.snap_to_border_on_drag,
                    );
                }
                EventResponse::Consumed
            }
        }
    }

    fn release(&mut self, event: &PointerEvent, timers: &mut dyn TimerService) -> EventResponse {
        if self.scrollbar_grab.is_some() {
            self.end_scrollbar_grab(timers);
            return EventResponse::Consumed;
        }

        if !self.gesture_grab {
            self.gesture.set_bypass_point(None);
            return EventResponse::Ignored;
        }
        self.end_gesture(timers);

        let capture = self.config.capture_button_press;
        match self.gesture.release(event.root, event.time_ms) {
            None => EventResponse::Ignored,
            Some(GestureRelease::Click { captured }) => {
                if let Some(press) = captured {
                    self.replay(press);
                }
                if !self.store.is_overshot() {
                    return EventResponse::Ignored;
                }
                self.settle(timers);
                self.gesture.set_bypass_point(None);
                EventResponse::consumed_if(capture)
            }
            Some(GestureRelease::Fling { mut velocity }) => {
                for axis in Axis::ALL {
                    if !self.store.is_visible(axis) {
                        velocity.set(axis, 0.0);
                    }
                }
                if self.start_kinetic(velocity, timers) {
                    self.gesture.set_bypass_point(None);
                } else {
                    self.gesture.set_bypass_point(Some(event.root));
                }
                EventResponse::consumed_if(capture)
            }
        }
    }

    // =========================================================================
    // Scrollbars
    // =========================================================================

    fn scrollbar_press(
        &mut self,
        event: &PointerEvent,
        hit: ScrollbarHitResult,
        timers: &mut dyn TimerService,
    ) -> EventResponse {
        let Some(axis) = hit.axis() else {
            return EventResponse::Ignored;
        };
        let warps = self.config.primary_button_warps_slider;
        let warp = match event.button {
            PointerButton::Primary => warps,
            PointerButton::Middle => !warps,
            _ => return EventResponse::Ignored,
        };

        self.stop_kinetic(timers);
        for axis in Axis::ALL {
            let value = self.store.value(axis);
            self.store.set_value(axis, value, false, false);
        }

        let slider = self.scrollbar_rects().slider(axis);
        let pointer = event.local.along(axis);
        let slider_start = slider.origin.along(axis);

        let grab = if hit.is_thumb() {
            ScrollbarGrab::Thumb {
                axis,
                grab_offset: pointer - slider_start,
            }
        } else if warp {
            let grab_offset = slider.size.along(axis) / 2.0;
            self.drag_thumb(axis, grab_offset, event);
            ScrollbarGrab::Thumb { axis, grab_offset }
        } else {
            let direction = if pointer < slider_start { -1.0 } else { 1.0 };
            self.page(axis, direction);
            self.page_timer = Some(timers.start_once(self.config.scrollbar.page_repeat_initial_ms));
            ScrollbarGrab::Track { axis, direction }
        };

        tracing::debug!("scrollbar grabbed pointer: {:?}", grab);
        self.scrollbar_grab = Some(grab);
        EventResponse::Consumed
    }

    fn drag_thumb(&mut self, axis: Axis, grab_offset: f64, event: &PointerEvent) {
        let value = thumb_drag_value(
            &self.store,
            self.viewport.size,
            &self.config.scrollbar,
            axis,
            grab_offset,
            event.local,
        );
        self.store.set_value(axis, value, false, false);
    }

    fn page(&mut self, axis: Axis, direction: f64) {
        let state = self.store.axis(axis);
        let target = state.value + direction * state.page_size;
        self.store.set_value(axis, target, false, false);
    }

    fn end_scrollbar_grab(&mut self, timers: &mut dyn TimerService) {
        if let Some(id) = self.page_timer.take() {
            timers.cancel(id);
        }
        if self.scrollbar_grab.take().is_some() {
            tracing::debug!("scrollbar released pointer");
        }
    }

    // =========================================================================
    // Scroll events
    // =========================================================================

    fn scroll(&mut self, event: &ScrollEvent, timers: &mut dyn TimerService) -> EventResponse {
        if !self.store.any_visible() {
            return EventResponse::Ignored;
        }

        let delta = match event.delta {
            ScrollDelta::Smooth { dx, dy } => Vec2::new(dx, dy),
            ScrollDelta::Steps { x, y } => {
                self.stop_kinetic(timers);
                let moved = self.scroll_clamped(Vec2::new(
                    self.wheel_delta(Axis::Horizontal) * f64::from(x),
                    self.wheel_delta(Axis::Vertical) * f64::from(y),
                ));
                // an axis the wheel did not touch may still be overshot
                self.settle(timers);
                return EventResponse::consumed_if(moved);
            }
        };

        match event.phase {
            ScrollPhase::None => {
                self.stop_kinetic(timers);
                let moved = self.scroll_clamped(delta);
                self.settle(timers);
                EventResponse::consumed_if(moved)
            }
            ScrollPhase::Start => {
                self.stop_kinetic(timers);
                self.gesture.begin_scroll(event.time_ms);
                self.scroll_clamped(delta);
                self.arm_scroll_timer(timers);
                EventResponse::Consumed
            }
            ScrollPhase::Update => {
                for axis in Axis::ALL {
                    let delta = delta.along(axis);
                    if delta != 0.0 && self.store.is_visible(axis) {
                        self.scroll_elastic(axis, delta);
                    }
                }
                self.gesture.sample_scroll(delta, event.time_ms);
                self.arm_scroll_timer(timers);
                EventResponse::Consumed
            }
            ScrollPhase::End => {
                self.cancel_scroll_timer(timers);
                if self.store.is_overshot() {
                    // momentum is the platform's; only overshot axes animate
                    let mut velocity = self.gesture.velocity();
                    for axis in Axis::ALL {
                        if self.store.overshoot(axis) == 0.0 {
                            velocity.set(axis, 0.0);
                        }
                    }
                    self.start_kinetic(velocity, timers);
                }
                EventResponse::Consumed
            }
        }
    }

    /// Restart the trackpad idle timeout while any axis is overshot
    fn arm_scroll_timer(&mut self, timers: &mut dyn TimerService) {
        self.cancel_scroll_timer(timers);
        if self.store.is_overshot() {
            self.scroll_timer = Some(timers.start_once(self.config.gesture.scroll_end_timeout_ms));
        }
    }

    /// Classic wheel step: `page_size^(2/3)`
    fn wheel_delta(&self, axis: Axis) -> f64 {
        self.store.axis(axis).page_size.max(0.0).powf(2.0 / 3.0)
    }

    fn scroll_clamped(&mut self, delta: Vec2) -> bool {
        let mut moved = false;
        for axis in Axis::ALL {
            let delta = delta.along(axis);
            if delta == 0.0 || !self.store.is_visible(axis) {
                continue;
            }
            let target = self.store.value(axis) + delta;
            self.store.set_value(axis, target, false, false);
            moved = true;
        }
        moved
    }

    /// Trackpad update: overshoot only from a border, with growing resistance
    fn scroll_elastic(&mut self, axis: Axis, delta: f64) {
        let state = *self.store.axis(axis);
        let current = state.unclamped_value;
        let at_border = current <= state.min_value() || current >= state.max_value();
        let allow = self.config.enable_overshoot && at_border;

        let overshoot = state.overshoot();
        let pushing_further = (overshoot > 0.0 && delta > 0.0) || (overshoot < 0.0 && delta < 0.0);
        let delta = if pushing_further && self.store.max_overshoot() > 0.0 {
            let stretch_ratio = (overshoot.abs() / self.store.max_overshoot()).min(1.0);
            // 55% at the border, 10% at full stretch
            delta * (0.55 - stretch_ratio * 0.45)
        } else {
            delta
        };

        self.store.set_value(
            axis,
            current + delta,
            allow,
            self.config.snap_to_border_on_drag,
        );
    }

    // =========================================================================
    // Timers
    // =========================================================================

    fn dispatch_timer(&mut self, id: TimerId, timers: &mut dyn TimerService) -> bool {
        if self.frame_timer == Some(id) {
            let outcome = self.kinetic.tick(&mut self.store, timers.now_ms());
            if outcome.finished {
                self.cancel_frame_timer(timers);
            }
            return true;
        }

        if self.release_timer == Some(id) {
            self.release_timer = None;
            if let Some(press) = self.gesture.timeout() {
                self.replay(press);
            }
            if self.gesture_grab && !self.gesture.is_dragging() {
                self.gesture_grab = false;
                tracing::debug!("drag gesture released pointer after timeout");
                self.settle(timers);
            }
            return true;
        }

        if self.scroll_timer == Some(id) {
            self.scroll_timer = None;
            tracing::debug!("trackpad gesture went quiet while overshot");
            self.settle(timers);
            return true;
        }

        if self.page_timer == Some(id) {
            self.page_timer = None;
            if let Some(ScrollbarGrab::Track { axis, direction }) = self.scrollbar_grab {
                self.page(axis, direction);
                self.page_timer = Some(timers.start_once(self.config.scrollbar.page_repeat_ms));
            }
            return true;
        }

        self.scrollbars.on_timer(id, timers)
    }

    fn start_kinetic(&mut self, velocity: Vec2, timers: &mut dyn TimerService) -> bool {
        self.cancel_scroll_timer(timers);
        if !self.kinetic.start(&self.store, velocity, timers.now_ms()) {
            self.cancel_frame_timer(timers);
            return false;
        }
        if self.frame_timer.is_none() {
            self.frame_timer = Some(timers.start_repeating(self.config.physics.frame_interval_ms));
        }
        true
    }

    /// Snap back any overshoot
    fn settle(&mut self, timers: &mut dyn TimerService) {
        if self.store.is_overshot() {
            self.start_kinetic(Vec2::ZERO, timers);
        }
    }

    fn stop_kinetic(&mut self, timers: &mut dyn TimerService) {
        self.kinetic.cancel();
        self.cancel_frame_timer(timers);
        self.cancel_scroll_timer(timers);
    }

    /// Drop the gesture grab and its release timeout
    fn end_gesture(&mut self, timers: &mut dyn TimerService) {
        self.cancel_release_timer(timers);
        if self.gesture_grab {
            self.gesture_grab = false;
            tracing::debug!("drag gesture released pointer");
        }
    }

    fn cancel_frame_timer(&mut self, timers: &mut dyn TimerService) {
        if let Some(id) = self.frame_timer.take() {
            timers.cancel(id);
        }
    }

    fn cancel_release_timer(&mut self, timers: &mut dyn TimerService) {
        if let Some(id) = self.release_timer.take() {
            timers.cancel(id);
        }
    }

    fn cancel_scroll_timer(&mut self, timers: &mut dyn TimerService) {
        if let Some(id) = self.scroll_timer.take() {
            timers.cancel(id);
        }
    }

    // =========================================================================
    // Dispatch plumbing
    // =========================================================================

    fn replay(&mut self, press: PointerEvent) {
        tracing::debug!("replaying captured press at {:?}", press.root);
        self.pending_replays.push(press);
    }

    /// Run `f` with the timer service borrowed, then report what changed
    ///
    /// Returns `None` without running `f` if the service is already borrowed.
    fn with_timers<R>(
        &mut self,
        f: impl FnOnce(&mut Self, &mut dyn TimerService) -> R,
    ) -> Option<R> {
        let timers = Rc::clone(&self.timers);
        let Ok(mut service) = timers.try_borrow_mut() else {
            tracing::error!("timer service already borrowed, event dropped");
            return None;
        };
        let result = f(self, &mut *service);

        // any value change counts as scrollbar activity
        let revision = self.store.revision();
        if revision != self.last_revision {
            self.last_revision = revision;
            self.scrollbars.activity(&mut *service);
        }
        drop(service);

        self.flush();
        Some(result)
    }

    /// Deliver queued replays and changed outputs
    fn flush(&mut self) {
        for press in std::mem::take(&mut self.pending_replays) {
            if let Some(callback) = self.on_replay.as_mut() {
                callback(&press);
            }
        }

        let overshoot = self.store.overshoot_vec();
        if overshoot != self.last_overshoot {
            self.last_overshoot = overshoot;
            let window = self.overshoot_window();
            if let Some(callback) = self.on_overshoot_changed.as_mut() {
                callback(&window);
            }
        }

        let opacity = self.scrollbars.opacity();
        if opacity != self.last_opacity {
            self.last_opacity = opacity;
            if let Some(callback) = self.on_opacity_changed.as_mut() {
                callback(opacity);
            }
        }
    }
}

impl Drop for ScrollController {
    fn drop(&mut self) {
        let Ok(mut timers) = self.timers.try_borrow_mut() else {
            tracing::warn!("timer service borrowed while dropping scroll controller");
            return;
        };
        for id in [
            self.frame_timer.take(),
            self.release_timer.take(),
            self.page_timer.take(),
            self.scroll_timer.take(),
        ]
        .into_iter()
        .flatten()
        {
            timers.cancel(id);
        }
        self.scrollbars.cancel_all(&mut *timers);
    }
}
