//! In-memory index of upcoming rotations
//!
//! The schedule is a cache over the token store: the fine sweep pops due
//! entries from it, and the full sweep rebuilds it from the store, so an
//! entry lost or left stale here only delays a rotation until the next full
//! sweep.

use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Entries {
    due_by_token: HashMap<Uuid, DateTime<Utc>>,
    queue: BTreeSet<(DateTime<Utc>, Uuid)>,
}

impl Entries {
    fn insert(&mut self, token_id: Uuid, due: DateTime<Utc>) {
        if let Some(previous) = self.due_by_token.insert(token_id, due) {
            self.queue.remove(&(previous, token_id));
        }
        self.queue.insert((due, token_id));
    }

    fn remove(&mut self, token_id: Uuid) -> bool {
        match self.due_by_token.remove(&token_id) {
            Some(due) => {
                self.queue.remove(&(due, token_id));
                true
            }
            None => false,
        }
    }
}

/// Token id to rotation time, ordered by time
#[derive(Debug, Default)]
pub struct RotationSchedule {
    entries: Mutex<Entries>,
}

impl RotationSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Schedules (or reschedules) a token
    pub fn schedule(&self, token_id: Uuid, due: DateTime<Utc>) {
        self.lock().insert(token_id, due);
    }

    /// Removes a token, returning whether it was scheduled
    pub fn cancel(&self, token_id: Uuid) -> bool {
        self.lock().remove(token_id)
    }

    pub fn due_at(&self, token_id: Uuid) -> Option<DateTime<Utc>> {
        self.lock().due_by_token.get(&token_id).copied()
    }

    /// Removes and returns every entry due at or before `now`, earliest first
    pub fn take_due(&self, now: DateTime<Utc>) -> Vec<(Uuid, DateTime<Utc>)> {
        let mut entries = self.lock();
        let mut taken = Vec::new();
        while let Some(&(due, token_id)) = entries.queue.first() {
            if due > now {
                break;
            }
            entries.queue.remove(&(due, token_id));
            entries.due_by_token.remove(&token_id);
            taken.push((token_id, due));
        }
        taken
    }

    /// Earliest scheduled rotation
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.lock().queue.first().map(|(due, _)| *due)
    }

    pub fn len(&self) -> usize {
        self.lock().due_by_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces all entries
    pub fn rebuild(&self, entries: impl IntoIterator<Item = (Uuid, DateTime<Utc>)>) {
        let mut fresh = Entries::default();
        for (token_id, due) in entries {
            fresh.insert(token_id, due);
        }
        *self.lock() = fresh;
    }
}
