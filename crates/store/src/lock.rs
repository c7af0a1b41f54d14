//! Per-record mutation locks.
//!
//! Mutations of the same record are serialized so that responses are applied
//! in the order the mutations were issued. Mutations of different records run
//! concurrently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use hrsync_core::RecordId;
use tokio::sync::OwnedMutexGuard;

type Slot = Arc<tokio::sync::Mutex<()>>;

#[derive(Debug, Default)]
struct Entry {
    slot: Slot,
    /// Holder plus waiters.
    users: usize,
}

/// Async locks keyed by record identifier.
#[derive(Debug, Default)]
pub struct RecordLocks {
    slots: Mutex<HashMap<RecordId, Entry>>,
}

impl RecordLocks {
    /// No locks held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other mutation holds `id`, then hold it until the guard drops.
    ///
    /// Waiters are served in FIFO order. A waiter dropped before it gets the
    /// lock gives up its place without leaving the entry behind.
    pub async fn acquire(&self, id: &RecordId) -> RecordGuard<'_> {
        let (slot, ticket) = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            let entry = slots.entry(id.clone()).or_default();
            entry.users += 1;
            let ticket = Ticket {
                owner: self,
                id: id.clone(),
            };
            (entry.slot.clone(), ticket)
        };
        let guard = slot.lock_owned().await;

        RecordGuard {
            _guard: guard,
            _ticket: ticket,
        }
    }

    /// Number of records with a held or awaited lock.
    pub fn active(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// One use of a record's entry; the last one out removes it.
#[derive(Debug)]
struct Ticket<'a> {
    owner: &'a RecordLocks,
    id: RecordId,
}

impl Drop for Ticket<'_> {
    fn drop(&mut self) {
        let mut slots = self.owner.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = slots.get_mut(&self.id) {
            entry.users -= 1;
            if entry.users == 0 {
                slots.remove(&self.id);
            }
        }
    }
}

/// Holds one record's lock.
#[derive(Debug)]
pub struct RecordGuard<'a> {
    // Unlock before giving up the entry.
    _guard: OwnedMutexGuard<()>,
    _ticket: Ticket<'a>,
}
