//! Frame timer scheduler
//!
//! Timers are tokens. Starting a timer returns a [`TimerId`]; the host
//! advances the clock, receives the ids that fired, and hands each one to
//! whoever owns it. Nothing is called back from inside the scheduler, so an
//! owner may cancel any timer (including the one being dispatched) at any time.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{new_key_type, Key, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle to a pending timer
    pub struct TimerId;
}

/// A clock plus cancellable repeating and one-shot timers
pub trait TimerService {
    /// Current time in milliseconds
    fn now_ms(&self) -> f64;

    /// Start a timer that fires every `interval_ms` until cancelled
    fn start_repeating(&mut self, interval_ms: f64) -> TimerId;

    /// Start a timer that fires once after `delay_ms`
    fn start_once(&mut self, delay_ms: f64) -> TimerId;

    /// Cancel a timer, returning whether it was still pending
    fn cancel(&mut self, id: TimerId) -> bool;

    /// Whether the timer is still scheduled to fire
    fn is_pending(&self, id: TimerId) -> bool;

    /// Whether the service accepts new timers
    fn is_running(&self) -> bool;
}

/// Shared handle to a timer service, as held by controllers
pub type SharedTimers = Rc<RefCell<dyn TimerService>>;

/// Fired timers returned by one advance; frames rarely fire more than a few
pub type FiredTimers = SmallVec<[TimerId; 4]>;

/// Intervals are floored to this to keep repeating timers finite
const MIN_INTERVAL_MS: f64 = 0.001;

#[derive(Clone, Copy, Debug)]
struct TimerEntry {
    deadline: f64,
    /// `None` for one-shot timers
    interval: Option<f64>,
}

/// Deterministic, manually-advanced timer service
///
/// Time only moves when [`advance_to`](FrameScheduler::advance_to) or
/// [`advance_by`](FrameScheduler::advance_by) is called. A repeating timer
/// whose deadline was passed several times during one advance fires once.
pub struct FrameScheduler {
    timers: SlotMap<TimerId, TimerEntry>,
    now: f64,
    running: bool,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    /// Create a scheduler whose clock starts at `now_ms`
    pub fn starting_at(now_ms: f64) -> Self {
        Self {
            timers: SlotMap::with_key(),
            now: now_ms,
            running: true,
        }
    }

    /// Move the clock to `now_ms` and collect every timer that came due,
    /// ordered by deadline
    ///
    /// A clock value in the past leaves the clock where it is.
    pub fn advance_to(&mut self, now_ms: f64) -> FiredTimers {
        if now_ms > self.now {
            self.now = now_ms;
        }
        let now = self.now;

        let mut due: SmallVec<[(f64, TimerId); 4]> = self
            .timers
            .iter()
            .filter(|(_, entry)| entry.deadline <= now)
            .map(|(id, entry)| (entry.deadline, id))
            .collect();
        due.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut fired = FiredTimers::new();
        for (_, id) in due {
            let reschedule = match self.timers.get_mut(id) {
                Some(entry) => match entry.interval {
                    Some(interval) => {
                        let missed = ((now - entry.deadline) / interval).floor();
                        entry.deadline += interval * (missed + 1.0);
                        true
                    }
                    None => false,
                },
                None => continue,
            };
            if !reschedule {
                self.timers.remove(id);
            }
            fired.push(id);
        }

        if !fired.is_empty() {
            tracing::trace!("t={:.1}ms: {} timer(s) fired", now, fired.len());
        }
        fired
    }

    /// Move the clock forward by `delta_ms`
    pub fn advance_by(&mut self, delta_ms: f64) -> FiredTimers {
        self.advance_to(self.now + delta_ms.max(0.0))
    }

    /// Earliest pending deadline, if any timer is scheduled
    pub fn next_deadline(&self) -> Option<f64> {
        self.timers
            .values()
            .map(|entry| entry.deadline)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Number of scheduled timers
    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    /// Drop every timer and refuse new ones
    pub fn shutdown(&mut self) {
        tracing::debug!("frame scheduler shut down with {} pending", self.timers.len());
        self.timers.clear();
        self.running = false;
    }

    fn insert(&mut self, delay_ms: f64, interval: Option<f64>) -> TimerId {
        if !self.running {
            tracing::warn!("timer requested after scheduler shutdown");
            return TimerId::null();
        }
        self.timers.insert(TimerEntry {
            deadline: self.now + delay_ms.max(0.0),
            interval,
        })
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerService for FrameScheduler {
    fn now_ms(&self) -> f64 {
        self.now
    }

    fn start_repeating(&mut self, interval_ms: f64) -> TimerId {
        let interval = interval_ms.max(MIN_INTERVAL_MS);
        self.insert(interval, Some(interval))
    }

    fn start_once(&mut self, delay_ms: f64) -> TimerId {
        self.insert(delay_ms, None)
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
