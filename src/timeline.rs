// SPDX-License-Identifier: PMPL-1.0-or-later

//! Virtual-clock timer queue.
//!
//! Timers fire in deadline order; timers sharing a deadline fire in the order
//! they were scheduled. Nothing here sleeps: callers advance the clock, either
//! in tests or from a realtime driver that waits for [`Timeline::next_deadline`].

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Scheduled<T> {
    deadline: Duration,
    id: TimerId,
    payload: T,
}

impl<T> PartialEq for Scheduled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.id == other.id
    }
}

impl<T> Eq for Scheduled<T> {}

impl<T> PartialOrd for Scheduled<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Scheduled<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // ids are handed out in scheduling order
        self.deadline
            .cmp(&other.deadline)
            .then(self.id.cmp(&other.id))
    }
}

#[derive(Debug)]
pub struct Timeline<T> {
    now: Duration,
    next_id: u64,
    queue: BinaryHeap<Reverse<Scheduled<T>>>,
    cancelled: HashSet<TimerId>,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Timeline<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            queue: BinaryHeap::new(),
            cancelled: HashSet::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.queue.push(Reverse(Scheduled {
            deadline: self.now + delay,
            id,
            payload,
        }));
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or was unknown.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let pending = self
            .queue
            .iter()
            .any(|Reverse(entry)| entry.id == id && !self.cancelled.contains(&id));
        if pending {
            self.cancelled.insert(id);
        }
        pending
    }

    pub fn pending(&self) -> usize {
        self.queue
            .iter()
            .filter(|Reverse(entry)| !self.cancelled.contains(&entry.id))
            .count()
    }

    pub fn next_deadline(&mut self) -> Option<Duration> {
        self.discard_cancelled_head();
        self.queue.peek().map(|Reverse(entry)| entry.deadline)
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its deadline. Returns `None` once nothing else is due.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, T)> {
        self.discard_cancelled_head();
        let due = matches!(self.queue.peek(), Some(Reverse(entry)) if entry.deadline <= until);
        if !due {
            return None;
        }
        let Reverse(entry) = self.queue.pop()?;
        self.now = self.now.max(entry.deadline);
        Some((entry.id, entry.payload))
    }

    /// Move the clock forward without firing anything. Never moves backwards.
    pub fn set_now(&mut self, at: Duration) {
        self.now = self.now.max(at);
    }

    fn discard_cancelled_head(&mut self) {
        while let Some(Reverse(entry)) = self.queue.peek() {
            if !self.cancelled.remove(&entry.id) {
                break;
            }
            self.queue.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn fires_in_deadline_then_schedule_order() {
        let mut timeline = Timeline::new();
        timeline.schedule(ms(300), "late");
        timeline.schedule(ms(100), "first");
        timeline.schedule(ms(100), "second");

        let mut fired = Vec::new();
        while let Some((_, label)) = timeline.pop_due(ms(1000)) {
            fired.push(label);
        }
        assert_eq!(fired, vec!["first", "second", "late"]);
        assert_eq!(timeline.now(), ms(300));
    }

    #[test]
    fn nothing_fires_before_deadline() {
        let mut timeline = Timeline::new();
        timeline.schedule(ms(500), ());
        assert!(timeline.pop_due(ms(499)).is_none());
        assert!(timeline.pop_due(ms(500)).is_some());
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut timeline = Timeline::new();
        let id = timeline.schedule(ms(10), "stale");
        timeline.schedule(ms(20), "fresh");
        assert!(timeline.cancel(id));
        assert!(!timeline.cancel(id));
        assert_eq!(timeline.pending(), 1);
        assert_eq!(timeline.next_deadline(), Some(ms(20)));
        assert_eq!(timeline.pop_due(ms(100)).map(|(_, p)| p), Some("fresh"));
    }

    #[test]
    fn delays_are_relative_to_current_clock() {
        let mut timeline = Timeline::new();
        timeline.set_now(ms(1000));
        timeline.schedule(ms(50), ());
        assert_eq!(timeline.next_deadline(), Some(ms(1050)));
    }
}
