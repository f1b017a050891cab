//! One-shot timers as data
//!
//! Every scheduled timer gets a [`TimerId`] that doubles as its cancellation
//! token. Owners keep the ids they care about and compare them when a timer
//! fires; a timer that was cancelled never comes out of the queue.

use serde::{Deserialize, Serialize};

/// Cancellation token for a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// Target turns green (Spawned -> Active)
    WindowOpen { target: u32 },
    /// Target stops being green (Active -> Expired)
    WindowClose { target: u32 },
    /// Target lifespan is over, resolve as a miss
    Expiry { target: u32 },
    /// Spawn the next target
    Respawn,
}

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fired {
    pub id: TimerId,
    pub due: f64,
    pub kind: TimerKind,
}

/// Pending one-shot timers, fired in (due, id) order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerQueue {
    pending: Vec<Fired>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` to fire at absolute time `due` (ms)
    pub fn schedule(&mut self, due: f64, kind: TimerKind) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending.push(Fired { id, due, kind });
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    /// Cancel every pending timer of the given kind
    pub fn cancel_kind(&mut self, kind: TimerKind) -> usize {
        let before = self.pending.len();
        self.pending.retain(|t| t.kind != kind);
        before - self.pending.len()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return the earliest timer due at or before `now`
    pub fn pop_due(&mut self, now: f64) -> Option<Fired> {
        let idx = self.earliest()?;
        if self.pending[idx].due <= now {
            Some(self.pending.remove(idx))
        } else {
            None
        }
    }

    /// Remove and return the earliest timer due strictly before `t`
    pub fn pop_before(&mut self, t: f64) -> Option<Fired> {
        let idx = self.earliest()?;
        if self.pending[idx].due < t {
            Some(self.pending.remove(idx))
        } else {
            None
        }
    }

    fn earliest(&self) -> Option<usize> {
        self.pending
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)))
            .map(|(i, _)| i)
    }
}
