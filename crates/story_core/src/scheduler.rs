//! Deadline scheduler for the viewer's cancellable timers.
//!
//! Every armed timer gets a fresh [`TimerId`]; cancelling removes it so it can
//! never fire afterwards. Due timers are handed out one at a time in
//! `(due, arm order)` order, which lets a handler cancel later timers before
//! they are popped.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired<K> {
    pub id: TimerId,
    pub kind: K,
    pub due: Duration,
}

#[derive(Debug)]
struct Pending<K> {
    id: TimerId,
    kind: K,
    due: Duration,
}

#[derive(Debug)]
pub struct Scheduler<K> {
    next_id: u64,
    pending: Vec<Pending<K>>,
}

impl<K> Default for Scheduler<K> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<K: Copy> Scheduler<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm_at(&mut self, due: Duration, kind: K) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending.push(Pending { id, kind, due });
        id
    }

    /// Returns `false` when the timer already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|timer| timer.id != id);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.pending.len();
        self.pending.clear();
        cancelled
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|timer| timer.id == id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.pending.iter().map(|timer| timer.due).min()
    }

    pub fn pop_due(&mut self, now: Duration) -> Option<Fired<K>> {
        let position = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= now)
            .min_by_key(|(_, timer)| (timer.due, timer.id))
            .map(|(position, _)| position)?;
        let timer = self.pending.swap_remove(position);
        Some(Fired {
            id: timer.id,
            kind: timer.kind,
            due: timer.due,
        })
    }
}
