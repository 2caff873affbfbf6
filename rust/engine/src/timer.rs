//! Scoped one-shot timers driven by the host's clock.
//!
//! Nothing fires on its own: the owner calls [`TimerSet::fire_due`] with the
//! current time and gets back every event whose deadline has passed. A
//! cancelled handle is simply absent, so a stale timer can never fire.

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Pending<T> {
    handle: TimerHandle,
    due: DateTime<Utc>,
    event: T,
}

#[derive(Debug, Clone)]
pub struct TimerSet<T> {
    pending: Vec<Pending<T>>,
    next: u64,
}

impl<T> Default for TimerSet<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next: 1,
        }
    }
}

impl<T> TimerSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: DateTime<Utc>, delay: Duration, event: T) -> TimerHandle {
        let handle = TimerHandle(self.next);
        self.next += 1;
        self.pending.push(Pending {
            handle,
            due: now + delay,
            event,
        });
        handle
    }

    /// Removes and returns due events in deadline order.
    pub fn fire_due(&mut self, now: DateTime<Utc>) -> Vec<(TimerHandle, T)> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = rest;
        due.sort_by_key(|p| (p.due, p.handle));
        due.into_iter().map(|p| (p.handle, p.event)).collect()
    }

    /// Returns `true` if the handle was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
