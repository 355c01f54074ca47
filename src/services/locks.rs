use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// Registry of per-event mutexes.
///
/// Multi-step store sequences that must not interleave for the same event
/// (capacity check then insert, delete then cascade) run while holding the
/// event's lock. Different events proceed fully in parallel; there is no
/// global lock around any store operation.
#[derive(Debug, Default)]
pub struct EventLocks {
    inner: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl EventLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, event_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut registry = self.inner.lock().unwrap_or_else(|p| p.into_inner());
            registry
                .entry(event_id)
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Drops the registry entry for an event that no longer exists.
    /// Callers that raced on the old mutex re-read the store and observe
    /// the deletion; a fresh entry is created on demand if the id recurs.
    pub fn discard(&self, event_id: Uuid) {
        self.inner
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .remove(&event_id);
    }
}
