//! Input events
//!
//! Toolkit-agnostic events consumed by the scroll controller. Hosts translate
//! their native press/motion/release, wheel and enter/leave events into these.

use crate::geometry::Point;

/// Event type identifier
pub type EventType = u32;

/// Event types driving the built-in state machines
pub mod event_types {
    use super::EventType;

    pub const POINTER_DOWN: EventType = 1;
    pub const POINTER_UP: EventType = 2;
    /// Pointer moved past the drag threshold while pressed
    pub const DRAG: EventType = 6;

    // Timer-driven events
    /// A one-shot deadline elapsed
    pub const TIMEOUT: EventType = 40;
    /// A fixed-duration animation reached its end value
    pub const ANIMATION_DONE: EventType = 41;

    /// Another component took the pointer grab
    pub const GRAB_BROKEN: EventType = 50;
    /// Something worth showing scrollbars for happened
    pub const ACTIVITY: EventType = 60;
}

/// Pointer buttons
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Middle,
    Secondary,
    Other(u8),
}

/// Kind of pointer event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Press,
    Motion,
    Release,
}

/// A pointer (mouse/touch) event
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// Root (screen) coordinates, used for drag tracking
    pub root: Point,
    /// Coordinates relative to the scrolled viewport, used for scrollbar hit tests
    pub local: Point,
    /// Button that was pressed or released (ignored for motion)
    pub button: PointerButton,
    /// Whether the primary button is held (meaningful for motion)
    pub primary_held: bool,
    /// Event timestamp in milliseconds
    pub time_ms: f64,
}

impl PointerEvent {
    fn new(kind: PointerKind, position: Point, time_ms: f64) -> Self {
        Self {
            kind,
            root: position,
            local: position,
            button: PointerButton::Primary,
            primary_held: kind != PointerKind::Release,
            time_ms,
        }
    }

    /// Primary button press where root and local coordinates coincide
    pub fn press(position: Point, time_ms: f64) -> Self {
        Self::new(PointerKind::Press, position, time_ms)
    }

    /// Motion with the primary button held
    pub fn motion(position: Point, time_ms: f64) -> Self {
        Self::new(PointerKind::Motion, position, time_ms)
    }

    /// Primary button release
    pub fn release(position: Point, time_ms: f64) -> Self {
        Self::new(PointerKind::Release, position, time_ms)
    }

    /// Motion without any button held (hover)
    pub fn hover(position: Point, time_ms: f64) -> Self {
        Self {
            primary_held: false,
            ..Self::new(PointerKind::Motion, position, time_ms)
        }
    }

    /// Override the viewport-local coordinates
    pub fn with_local(mut self, local: Point) -> Self {
        self.local = local;
        self
    }

    /// Override the button
    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }
}

/// Momentum phase reported by trackpads
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ScrollPhase {
    /// Plain wheel event, no gesture phases
    #[default]
    None,
    Start,
    Update,
    End,
}

/// Scroll amount carried by a scroll event
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollDelta {
    /// Precise per-axis deltas in axis units (trackpads, smooth wheels)
    Smooth { dx: f64, dy: f64 },
    /// Discrete wheel clicks; positive scrolls toward `upper`
    Steps { x: i32, y: i32 },
}

/// A wheel or trackpad scroll event
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollEvent {
    pub delta: ScrollDelta,
    pub phase: ScrollPhase,
    pub time_ms: f64,
}

impl ScrollEvent {
    pub fn smooth(dx: f64, dy: f64, time_ms: f64) -> Self {
        Self {
            delta: ScrollDelta::Smooth { dx, dy },
            phase: ScrollPhase::None,
            time_ms,
        }
    }

    pub fn steps(x: i32, y: i32, time_ms: f64) -> Self {
        Self {
            delta: ScrollDelta::Steps { x, y },
            phase: ScrollPhase::None,
            time_ms,
        }
    }

    pub fn with_phase(mut self, phase: ScrollPhase) -> Self {
        self.phase = phase;
        self
    }
}

/// Pointer entering or leaving the scrolled container
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CrossingKind {
    Enter,
    Leave,
}

/// Enter/leave notification
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrossingEvent {
    pub kind: CrossingKind,
    /// The crossing was synthesized by a grab change rather than real motion
    pub from_grab: bool,
    pub time_ms: f64,
}

impl CrossingEvent {
    pub fn enter(time_ms: f64) -> Self {
        Self {
            kind: CrossingKind::Enter,
            from_grab: false,
            time_ms,
        }
    }

    pub fn leave(time_ms: f64) -> Self {
        Self {
            kind: CrossingKind::Leave,
            from_grab: false,
            time_ms,
        }
    }
}
