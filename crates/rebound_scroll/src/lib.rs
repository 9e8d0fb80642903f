//! Rebound Scroll
//!
//! Kinetic scrolling physics for a single scrollable viewport:
//!
//! - **Position Store**: clamped per-axis values with bounded overshoot
//! - **Gesture Tracking**: click vs. drag classification and release velocity
//! - **Kinetic Motion**: friction deceleration and damped snap-back
//! - **Overlay Scrollbars**: fade animation, hit rects, thumb drag and paging
//!
//! Everything runs on one thread. Time comes from a [`TimerService`]; the host
//! advances it and hands fired ids back to [`ScrollController::on_timer`].
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use rebound_animation::{FrameScheduler, SharedTimers};
//! use rebound_core::{Axis, Point, PointerEvent, Rect};
//! use rebound_scroll::{ScrollConfig, ScrollController};
//!
//! let scheduler = Rc::new(RefCell::new(FrameScheduler::new()));
//! let timers: SharedTimers = scheduler.clone();
//! let mut controller = ScrollController::new(ScrollConfig::default(), timers).unwrap();
//! controller.set_viewport(Rect::new(0.0, 0.0, 300.0, 200.0));
//! controller.set_bounds(Axis::Vertical, 0.0, 1000.0, 200.0);
//!
//! // flick upward
//! controller.handle_pointer(&PointerEvent::press(Point::new(50.0, 150.0), 0.0));
//! controller.handle_pointer(&PointerEvent::motion(Point::new(50.0, 100.0), 16.0));
//! controller.handle_pointer(&PointerEvent::release(Point::new(50.0, 90.0), 32.0));
//!
//! while controller.is_animating() {
//!     let fired = scheduler.borrow_mut().advance_by(1000.0 / 60.0);
//!     for id in fired {
//!         controller.on_timer(id);
//!     }
//! }
//! assert!(controller.value(Axis::Vertical) > 60.0);
//! ```
//!
//! [`TimerService`]: rebound_animation::TimerService

pub mod config;
pub mod controller;
pub mod error;
pub mod fade;
pub mod gesture;
pub mod kinetic;
pub mod overshoot;
pub mod scrollbar;
pub mod store;

pub use config::{GestureConfig, PhysicsConfig, ScrollConfig, ScrollbarConfig};
pub use controller::{EventResponse, ScrollController};
pub use error::{ConfigError, Result, ScrollError};
pub use fade::{FadePhase, ScrollbarAnimator};
pub use gesture::{GestureMotion, GesturePhase, GestureRelease, GestureTracker, VelocityTracker};
pub use kinetic::{AxisMotion, KineticEngine, TickOutcome};
pub use overshoot::OvershootWindow;
pub use scrollbar::{ScrollbarGrab, ScrollbarHitResult, ScrollbarRects, ThumbSpan};
pub use store::{ScrollAxis, ScrollStore};
