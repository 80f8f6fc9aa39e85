//! Shared timer scheduler.
//!
//! Scheduled entries carry a [`TimerEffect`] describing the mutation to apply;
//! the tick loop drains due entries and applies the effects itself, so no
//! callback ever holds a reference into simulation state. Cancellation is
//! explicit by id; stale device timers are additionally dropped at fire time
//! by their generation token.

use serde::{Deserialize, Serialize};

use crate::types::{TimerEffect, TimerId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerEntry {
    pub id: TimerId,
    pub fires_at_tick: u64,
    /// `Some(n)` re-arms the entry every `n` ticks after it fires.
    pub period: Option<u64>,
    pub effect: TimerEffect,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerQueue {
    entries: Vec<TimerEntry>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// One-shot entry firing at the given absolute tick.
    pub fn schedule_at(&mut self, fires_at_tick: u64, effect: TimerEffect) -> TimerId {
        self.push(fires_at_tick, None, effect)
    }

    /// Periodic entry first firing `period` ticks after `now`.
    pub fn schedule_every(&mut self, now: u64, period: u64, effect: TimerEffect) -> TimerId {
        self.push(now + period, Some(period), effect)
    }

    fn push(&mut self, fires_at_tick: u64, period: Option<u64>, effect: TimerEffect) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(TimerEntry {
            id,
            fires_at_tick,
            period,
            effect,
        });
        id
    }

    /// Remove a pending entry. Returns whether anything was cancelled; a
    /// cancelled entry never fires again.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        before != self.entries.len()
    }

    /// Remove and return all entries due at `tick`, in schedule order.
    /// Periodic entries are re-armed before being returned.
    pub fn take_due(&mut self, tick: u64) -> Vec<TimerEntry> {
        let mut due: Vec<TimerEntry> = Vec::new();
        let mut remaining = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            if entry.fires_at_tick <= tick {
                if let Some(period) = entry.period {
                    remaining.push(TimerEntry {
                        fires_at_tick: tick + period,
                        ..entry.clone()
                    });
                }
                due.push(entry);
            } else {
                remaining.push(entry);
            }
        }
        self.entries = remaining;
        due
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }
}
