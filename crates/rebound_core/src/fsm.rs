//! Event-driven state enums
//!
//! The gesture tracker, kinetic engine and scrollbar fader are each a small
//! flat state machine. States are plain `Copy` enums; transitions are a pure
//! `(state, event) -> Option<state>` table so they can be tested in isolation.

use std::fmt::Debug;
use std::hash::Hash;

use crate::events::EventType;

/// Trait for state enums that handle event transitions
///
/// # Example
///
/// ```rust
/// use rebound_core::events::event_types::*;
/// use rebound_core::StateTransitions;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// enum Latch {
///     #[default]
///     Open,
///     Held,
/// }
///
/// impl StateTransitions for Latch {
///     fn on_event(&self, event: u32) -> Option<Self> {
///         match (self, event) {
///             (Latch::Open, POINTER_DOWN) => Some(Latch::Held),
///             (Latch::Held, POINTER_UP) => Some(Latch::Open),
///             _ => None,
///         }
///     }
/// }
///
/// let mut latch = Latch::Open;
/// assert!(latch.apply(POINTER_DOWN));
/// assert_eq!(latch, Latch::Held);
/// assert!(!latch.apply(POINTER_DOWN));
/// ```
pub trait StateTransitions: Clone + Copy + PartialEq + Eq + Hash + Debug + 'static {
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: EventType) -> Option<Self>;

    /// Apply a transition in place, returning whether the state changed
    fn apply(&mut self, event: EventType) -> bool {
        match self.on_event(event) {
            Some(next) if next != *self => {
                *self = next;
                true
            }
            Some(_) | None => false,
        }
    }
}
