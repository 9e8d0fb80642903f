//! Overlay scrollbar fading
//!
//! Scrollbars fade in on activity, stay up while activity continues, and fade
//! out after an idle deadline. Hovering a bar holds them visible.
//!
//! ```text
//!  Hidden ──activity──▶ FadingIn ──done──▶ Visible
//!    ▲                    ▲   │               │
//!    │              activity  deadline    deadline
//!    │                    │   ▼               │
//!    └──────done──────── FadingOut ◀──────────┘
//! ```

use rebound_animation::{Easing, TimerId, TimerService, Tween};
use rebound_core::events::event_types;
use rebound_core::{EventType, StateTransitions};

use crate::config::ScrollbarConfig;

/// Visibility phase of the overlay scrollbars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FadePhase {
    /// Opacity 0, no timers
    #[default]
    Hidden,
    FadingIn,
    /// Fully shown, waiting for the idle deadline
    Visible,
    FadingOut,
}

impl StateTransitions for FadePhase {
    fn on_event(&self, event: EventType) -> Option<Self> {
        use event_types::*;
        match (self, event) {
            (FadePhase::Hidden, ACTIVITY) | (FadePhase::FadingOut, ACTIVITY) => {
                Some(FadePhase::FadingIn)
            }
            (FadePhase::FadingIn, ANIMATION_DONE) => Some(FadePhase::Visible),
            (FadePhase::FadingIn, TIMEOUT) | (FadePhase::Visible, TIMEOUT) => {
                Some(FadePhase::FadingOut)
            }
            (FadePhase::FadingOut, ANIMATION_DONE) => Some(FadePhase::Hidden),
            _ => None,
        }
    }
}

/// Opacity animator for the overlay scrollbars
///
/// Owns two timers: the animation frame timer (only while a fade runs) and
/// the idle deadline. Both are cancelled by [`cancel_all`](Self::cancel_all).
pub struct ScrollbarAnimator {
    config: ScrollbarConfig,
    fade_out_delay_ms: f64,
    frame_interval_ms: f64,
    enabled: bool,
    phase: FadePhase,
    opacity: f64,
    tween: Option<Tween>,
    frame_timer: Option<TimerId>,
    deadline: Option<TimerId>,
    hovering: bool,
    /// Draw the track background, latched from hover
    track_visible: bool,
}

impl ScrollbarAnimator {
    pub fn new(
        config: ScrollbarConfig,
        fade_out_delay_ms: f64,
        frame_interval_ms: f64,
        enabled: bool,
    ) -> Self {
        Self {
            config,
            fade_out_delay_ms,
            frame_interval_ms,
            enabled,
            phase: FadePhase::Hidden,
            opacity: 0.0,
            tween: None,
            frame_timer: None,
            deadline: None,
            hovering: false,
            track_visible: false,
        }
    }

    pub fn phase(&self) -> FadePhase {
        self.phase
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn track_visible(&self) -> bool {
        self.track_visible
    }

    /// A fade is running
    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn has_deadline(&self) -> bool {
        self.deadline.is_some()
    }

    /// Whether `id` is one of this animator's timers
    pub fn owns(&self, id: TimerId) -> bool {
        self.frame_timer == Some(id) || self.deadline == Some(id)
    }

    /// Turn overlay fading on or off; off hides immediately
    pub fn set_enabled(&mut self, enabled: bool, timers: &mut dyn TimerService) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if !enabled {
            self.cancel_all(timers);
            self.phase = FadePhase::Hidden;
            self.opacity = 0.0;
            self.hovering = false;
            self.track_visible = false;
        }
    }

    pub fn set_fade_out_delay(&mut self, delay_ms: f64) {
        self.fade_out_delay_ms = delay_ms;
    }

    /// Something scrolled: show the bars and restart the idle deadline
    pub fn activity(&mut self, timers: &mut dyn TimerService) {
        if !self.enabled {
            return;
        }
        if matches!(self.phase, FadePhase::Hidden | FadePhase::FadingOut) {
            self.start_fade_in(timers);
        }
        if !self.hovering {
            self.arm_deadline(timers);
        }
    }

    /// Pointer moved over a bar (`true`) or elsewhere in the viewport (`false`)
    pub fn hover(&mut self, over_bar: bool, timers: &mut dyn TimerService) {
        if !self.enabled {
            return;
        }
        if over_bar {
            self.hovering = true;
            self.track_visible = true;
            if matches!(self.phase, FadePhase::Hidden | FadePhase::FadingOut) {
                self.start_fade_in(timers);
            }
            self.cancel_deadline(timers);
        } else {
            self.hovering = false;
            // moving keeps shown bars shown
            if self.phase != FadePhase::Hidden {
                self.activity(timers);
            }
        }
    }

    /// Pointer left the container
    pub fn leave(&mut self, timers: &mut dyn TimerService) {
        if !self.enabled {
            return;
        }
        self.hovering = false;
        if self.deadline.is_none() && self.phase != FadePhase::Hidden {
            self.arm_deadline(timers);
        }
    }

    /// Handle a fired timer; false when `id` is not ours
    pub fn on_timer(&mut self, id: TimerId, timers: &mut dyn TimerService) -> bool {
        if self.deadline == Some(id) {
            self.deadline = None;
            self.start_fade_out(timers);
            return true;
        }
        if self.frame_timer == Some(id) {
            self.step(timers);
            return true;
        }
        false
    }

    /// Cancel both timers and freeze the current opacity
    pub fn cancel_all(&mut self, timers: &mut dyn TimerService) {
        self.stop_animation(timers);
        self.cancel_deadline(timers);
    }

    fn start_fade_in(&mut self, timers: &mut dyn TimerService) {
        let now = timers.now_ms();
        self.stop_animation(timers);
        self.track_visible = self.hovering;
        self.tween = Some(Tween::new(
            self.opacity,
            self.config.max_opacity,
            self.config.fade_in_ms,
            Easing::EaseOutQuad,
            now,
        ));
        self.frame_timer = Some(timers.start_repeating(self.frame_interval_ms));
        self.phase.apply(event_types::ACTIVITY);
        tracing::debug!("scrollbars fading in from {:.2}", self.opacity);
    }

    fn start_fade_out(&mut self, timers: &mut dyn TimerService) {
        let now = timers.now_ms();
        self.stop_animation(timers);
        self.tween = Some(Tween::new(
            self.opacity,
            0.0,
            self.config.fade_out_ms,
            Easing::EaseInQuad,
            now,
        ));
        self.frame_timer = Some(timers.start_repeating(self.frame_interval_ms));
        self.phase.apply(event_types::TIMEOUT);
        tracing::debug!("scrollbars fading out from {:.2}", self.opacity);
    }

    fn step(&mut self, timers: &mut dyn TimerService) {
        let Some(tween) = self.tween else {
            self.stop_animation(timers);
            return;
        };
        let now = timers.now_ms();
        self.opacity = tween.value_at(now);
        tracing::trace!("scrollbar opacity {:.3}", self.opacity);

        if tween.is_finished(now) {
            self.stop_animation(timers);
            self.phase.apply(event_types::ANIMATION_DONE);
        }
    }

    fn stop_animation(&mut self, timers: &mut dyn TimerService) {
        if let Some(id) = self.frame_timer.take() {
            timers.cancel(id);
        }
        self.tween = None;
    }

    fn arm_deadline(&mut self, timers: &mut dyn TimerService) {
        self.cancel_deadline(timers);
        self.deadline = Some(timers.start_once(self.fade_out_delay_ms));
    }

    fn cancel_deadline(&mut self, timers: &mut dyn TimerService) {
        if let Some(id) = self.deadline.take() {
            timers.cancel(id);
        }
    }
}
