#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic timer service for "wait, then act" sequences.
//!
//! The scheduler owns a simulated clock that only moves when [`Scheduler::advance`]
//! is called. Timers are armed against that clock and later drained one at a
//! time through [`Scheduler::pop_due`], which lets the caller cancel timers
//! that are still pending while it reacts to an earlier one in the same step.

use std::{fmt, time::Duration};

use log::trace;

/// Handle identifying an armed timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Timer that elapsed and was removed from (or re-armed in) the schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fired<K> {
    /// Caller-defined payload describing what the timer is for.
    pub key: K,
    /// Clock reading at which the timer was due.
    pub due: Duration,
}

#[derive(Clone, Debug)]
struct Pending<K> {
    handle: TimerHandle,
    key: K,
    due: Duration,
    period: Option<Duration>,
}

/// Simulated clock with one-shot and recurring timers.
#[derive(Clone, Debug)]
pub struct Scheduler<K> {
    now: Duration,
    next_handle: u64,
    pending: Vec<Pending<K>>,
}

impl<K> Default for Scheduler<K> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_handle: 0,
            pending: Vec::new(),
        }
    }
}

impl<K: Copy + fmt::Debug> Scheduler<K> {
    /// Creates an empty scheduler whose clock reads zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock reading.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Arms a timer that fires once after `delay`.
    pub fn arm_once(&mut self, delay: Duration, key: K) -> TimerHandle {
        self.arm(self.now.saturating_add(delay), None, key)
    }

    /// Arms a timer that fires once at the absolute clock reading `due`.
    ///
    /// A `due` that has already passed fires on the next [`Scheduler::pop_due`].
    pub fn arm_at(&mut self, due: Duration, key: K) -> TimerHandle {
        self.arm(due, None, key)
    }

    /// Arms a timer that fires every `interval` until cancelled.
    ///
    /// A zero interval is widened to one nanosecond so the timer cannot fire
    /// forever within a single clock reading.
    pub fn arm_recurring(&mut self, interval: Duration, key: K) -> TimerHandle {
        let interval = interval.max(Duration::from_nanos(1));
        self.arm(self.now.saturating_add(interval), Some(interval), key)
    }

    fn arm(&mut self, due: Duration, period: Option<Duration>, key: K) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        trace!("armed timer {} for {key:?} due at {due:?}", handle.get());
        self.pending.push(Pending {
            handle,
            key,
            due,
            period,
        });
        handle
    }

    /// Cancels a pending timer, reporting whether it was still armed.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|pending| pending.handle != handle);
        before != self.pending.len()
    }

    /// Reports whether the timer is still waiting to fire.
    #[must_use]
    pub fn is_armed(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|pending| pending.handle == handle)
    }

    /// Time left until the timer fires, if it is still armed.
    #[must_use]
    pub fn remaining(&self, handle: TimerHandle) -> Option<Duration> {
        self.pending
            .iter()
            .find(|pending| pending.handle == handle)
            .map(|pending| pending.due.saturating_sub(self.now))
    }

    /// Number of timers waiting to fire.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Reports whether no timers are waiting to fire.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Moves the clock forward by `dt` without firing anything.
    ///
    /// Timers whose due instant has been reached are handed out by
    /// [`Scheduler::pop_due`].
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    /// Removes and returns the earliest timer due at or before the clock reading.
    ///
    /// Ties resolve in arming order. Recurring timers are re-armed one period
    /// after their previous due instant, so a long step can yield the same
    /// recurring timer several times.
    pub fn pop_due(&mut self) -> Option<Fired<K>> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, pending)| pending.due <= self.now)
            .min_by_key(|(_, pending)| (pending.due, pending.handle))
            .map(|(index, _)| index)?;

        let handle = self.pending[index].handle;
        let fired = Fired {
            key: self.pending[index].key,
            due: self.pending[index].due,
        };

        match self.pending[index].period {
            Some(period) => {
                let pending = &mut self.pending[index];
                pending.due = pending.due.saturating_add(period);
            }
            None => {
                let _ = self.pending.swap_remove(index);
            }
        }

        trace!("timer {} for {:?} fired", handle.get(), fired.key);
        Some(fired)
    }
}
