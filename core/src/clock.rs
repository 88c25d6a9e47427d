//! Session clock and timer scheduler.
//!
//! Every time-based transition in a round (reel reveals, rocket ticks)
//! is a timer on this virtual clock. Nothing sleeps: the engine advances
//! the clock and dispatches whatever fell due.
//!
//! RULE: Every timer carries the id of the round that scheduled it.
//! A timer whose round is no longer active is dropped, never dispatched.

use crate::{
    resolver::Wakeup,
    types::{Millis, RoundId, SessionId},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClock {
    pub session_id: SessionId,
    pub now:        Millis,
}

impl SessionClock {
    pub fn new(session_id: SessionId) -> Self {
        Self { session_id, now: 0 }
    }

    /// Move the clock forward to `at`. Panics if asked to go backwards.
    pub fn advance_to(&mut self, at: Millis) -> Millis {
        assert!(at >= self.now, "clock moved backwards: {} -> {at}", self.now);
        self.now = at;
        self.now
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Timer {
    pub due:      Millis,
    pub round_id: RoundId,
    pub wakeup:   Wakeup,
}

/// Pending timers ordered by (due time, scheduling order).
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BTreeMap<(Millis, u64), Timer>,
    seq:   u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Millis, round_id: RoundId, wakeup: Wakeup) {
        self.seq += 1;
        self.queue.insert((due, self.seq), Timer { due, round_id, wakeup });
    }

    /// Pop the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: Millis) -> Option<Timer> {
        let key = *self.queue.keys().next()?;
        if key.0 > now {
            return None;
        }
        self.queue.remove(&key)
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Drop every timer belonging to `round_id`. Returns how many were dropped.
    pub fn cancel_round(&mut self, round_id: &str) -> usize {
        let before = self.queue.len();
        self.queue.retain(|_, t| t.round_id != round_id);
        before - self.queue.len()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_pop_in_due_order_then_fifo() {
        let mut s = Scheduler::new();
        s.schedule(300, "r".into(), Wakeup::RocketTick);
        s.schedule(100, "r".into(), Wakeup::RevealReel(2));
        s.schedule(100, "r".into(), Wakeup::RevealReel(0));

        assert_eq!(s.pop_due(50), None);
        assert_eq!(s.pop_due(300).map(|t| t.wakeup), Some(Wakeup::RevealReel(2)));
        assert_eq!(s.pop_due(300).map(|t| t.wakeup), Some(Wakeup::RevealReel(0)));
        assert_eq!(s.next_due(), Some(300));
    }

    #[test]
    fn cancel_round_leaves_other_rounds() {
        let mut s = Scheduler::new();
        s.schedule(10, "a".into(), Wakeup::RocketTick);
        s.schedule(20, "b".into(), Wakeup::RocketTick);
        s.schedule(30, "a".into(), Wakeup::SettleReels);

        assert_eq!(s.cancel_round("a"), 2);
        assert_eq!(s.pending(), 1);
        assert_eq!(s.pop_due(100).map(|t| t.round_id), Some("b".to_string()));
    }
}
