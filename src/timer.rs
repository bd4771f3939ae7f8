//! Cancellable one-shot timers
//!
//! State machines never own a real clock. They ask a `TimerHost` to schedule a
//! wake-up and keep the returned `TimerId`; a fired id that no longer matches
//! the pending one is stale and ignored.

use std::collections::BTreeSet;

/// Opaque handle for a scheduled wake-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Something that can deliver a wake-up after a delay
pub trait TimerHost {
    /// Schedule a single wake-up `delay_ms` from now
    fn schedule(&mut self, delay_ms: u32) -> TimerId;

    /// Cancel a pending wake-up (no-op if already fired or unknown)
    fn cancel(&mut self, id: TimerId);
}

/// Deterministic timer host driven by a virtual millisecond clock
///
/// Used by tests and the native demo. Timers due at the same instant fire in
/// scheduling order.
#[derive(Debug, Default)]
pub struct VirtualTimers {
    now_ms: u64,
    next_id: u64,
    /// Ordered by (due, id)
    pending: BTreeSet<(u64, TimerId)>,
}

impl VirtualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of wake-ups not yet fired or cancelled
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Due time of the earliest pending wake-up
    pub fn next_due(&self) -> Option<u64> {
        self.pending.first().map(|(due, _)| *due)
    }

    /// Pop the earliest wake-up due at or before `until_ms`, moving the clock to it
    pub fn pop_due(&mut self, until_ms: u64) -> Option<TimerId> {
        let (due, id) = *self.pending.first()?;
        if due > until_ms {
            return None;
        }
        self.pending.remove(&(due, id));
        self.now_ms = self.now_ms.max(due);
        Some(id)
    }

    /// Move the clock forward without firing anything
    pub fn advance_to(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

impl TimerHost for VirtualTimers {
    fn schedule(&mut self, delay_ms: u32) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending.insert((self.now_ms + u64::from(delay_ms), id));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.retain(|(_, pending)| *pending != id);
    }
}
