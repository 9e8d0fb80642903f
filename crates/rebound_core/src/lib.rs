//! Rebound Core
//!
//! Foundational types shared by the Rebound scrolling crates:
//!
//! - **Input Events**: Toolkit-agnostic pointer, scroll and crossing events
//! - **Geometry**: Points, sizes, rectangles and scroll axes
//! - **State Transitions**: Event-driven enums for the gesture and fade state machines
//!
//! # Example
//!
//! ```rust
//! use rebound_core::{Axis, Point, PointerEvent, PointerKind};
//!
//! let press = PointerEvent::press(Point::new(10.0, 240.0), 0.0);
//! assert_eq!(press.kind, PointerKind::Press);
//! assert_eq!(press.root.along(Axis::Vertical), 240.0);
//! ```

pub mod events;
pub mod fsm;
pub mod geometry;

pub use events::{
    CrossingEvent, CrossingKind, EventType, PointerButton, PointerEvent, PointerKind, ScrollDelta,
    ScrollEvent, ScrollPhase,
};
pub use fsm::StateTransitions;
pub use geometry::{Axis, Point, Rect, Size, Vec2};
