//! Scheduled callbacks on the session clock
//!
//! Timers live in a slot map so a cancelled or superseded timer's id can
//! never match a later timer. Due timers are handed out one at a time in
//! `(due, scheduling order)` order; the caller dispatches them.

use slotmap::{SlotMap, new_key_type};

use super::state::ItemId;

new_key_type! {
    /// Handle to a scheduled timer
    pub struct TimerId;
}

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Spawn,
    SuperModeEnd,
    ItemExpiry(ItemId),
}

#[derive(Debug, Clone)]
struct Timer {
    kind: TimerKind,
    /// Start of the current period
    anchor_ms: u64,
    delay_ms: u64,
    repeating: bool,
    seq: u64,
}

impl Timer {
    fn due_ms(&self) -> u64 {
        self.anchor_ms.saturating_add(self.delay_ms)
    }
}

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    pub kind: TimerKind,
    /// Scheduled time, which may be earlier than the current clock
    pub at_ms: u64,
}

#[derive(Debug, Default)]
pub struct Timers {
    timers: SlotMap<TimerId, Timer>,
    next_seq: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_once(&mut self, now_ms: u64, delay_ms: u64, kind: TimerKind) -> TimerId {
        self.insert(now_ms, delay_ms, kind, false)
    }

    /// Fire every `period_ms`, first at `now + period`
    pub fn schedule_repeating(&mut self, now_ms: u64, period_ms: u64, kind: TimerKind) -> TimerId {
        debug_assert!(period_ms > 0, "repeating timer needs a positive period");
        self.insert(now_ms, period_ms.max(1), kind, true)
    }

    fn insert(&mut self, now_ms: u64, delay_ms: u64, kind: TimerKind, repeating: bool) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(Timer {
            kind,
            anchor_ms: now_ms,
            delay_ms,
            repeating,
            seq,
        })
    }

    /// Returns false if the timer had already fired or been cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    /// Change the period of a live timer. The current period keeps its start,
    /// so the next firing moves to `start + period`, but never before `now_ms`.
    pub fn set_period(&mut self, id: TimerId, now_ms: u64, period_ms: u64) -> bool {
        match self.timers.get_mut(id) {
            Some(timer) => {
                timer.delay_ms = period_ms.max(1);
                timer.anchor_ms = timer.anchor_ms.max(now_ms.saturating_sub(timer.delay_ms));
                true
            }
            None => false,
        }
    }

    /// Time left before the timer fires
    pub fn remaining_ms(&self, id: TimerId, now_ms: u64) -> Option<u64> {
        self.timers
            .get(id)
            .map(|t| t.due_ms().saturating_sub(now_ms))
    }

    pub fn period_ms(&self, id: TimerId) -> Option<u64> {
        self.timers.get(id).map(|t| t.delay_ms)
    }

    /// Take the earliest timer due at or before `now_ms`. One-shot timers are
    /// removed; repeating timers advance by one period from their due time.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Fired> {
        let (id, due) = self
            .timers
            .iter()
            .filter(|(_, t)| t.due_ms() <= now_ms)
            .min_by_key(|(_, t)| (t.due_ms(), t.seq))
            .map(|(id, t)| (id, t.due_ms()))?;

        let timer = self.timers.get_mut(id)?;
        let kind = timer.kind;
        if timer.repeating {
            timer.anchor_ms = due;
            timer.seq = self.next_seq;
            self.next_seq += 1;
        } else {
            self.timers.remove(id);
        }

        Some(Fired { id, kind, at_ms: due })
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }
}
