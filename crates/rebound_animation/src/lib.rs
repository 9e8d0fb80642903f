//! Rebound Animation
//!
//! Time-based building blocks for the scroll physics controller.
//!
//! # Features
//!
//! - **Frame Timers**: Token-based repeating and one-shot timers behind the [`TimerService`] trait
//! - **Easing**: Quadratic ease-in and ease-out curves for opacity fades
//! - **Tweens**: Fixed-duration value animations sampled against a clock
//! - **Snap-Back**: Damped-oscillation return of an overshot position
//!
//! # Example
//!
//! ```rust
//! use rebound_animation::{FrameScheduler, TimerService};
//!
//! let mut scheduler = FrameScheduler::new();
//! let frame = scheduler.start_repeating(1000.0 / 60.0);
//!
//! let fired = scheduler.advance_by(20.0);
//! assert_eq!(fired.as_slice(), &[frame]);
//! assert!(scheduler.cancel(frame));
//! ```

pub mod easing;
pub mod scheduler;
pub mod spring;
pub mod tween;

pub use easing::Easing;
pub use scheduler::{FrameScheduler, SharedTimers, TimerId, TimerService};
pub use spring::{SnapBack, SpringConfig};
pub use tween::Tween;
