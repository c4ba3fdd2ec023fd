//! Per-key locking so two workers never fetch the same cache slot.

use crate::types::CacheKey;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::OwnedMutexGuard;

type LockMap = HashMap<CacheKey, Arc<tokio::sync::Mutex<()>>>;

/// Registry of one async mutex per cache key currently in use
///
/// Entries are created on first acquire and dropped by [`KeyLocks::release`]
/// once nobody holds or waits for them, so the map only holds keys in flight.
#[derive(Default)]
pub(crate) struct KeyLocks {
    locks: Mutex<LockMap>,
}

impl KeyLocks {
    fn map(&self) -> MutexGuard<'_, LockMap> {
        // The map is only mutated under short critical sections; a poisoned
        // lock still holds a consistent map.
        self.locks.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Wait until no other task holds `key`, then hold it until the guard drops
    pub(crate) async fn acquire(&self, key: &CacheKey) -> OwnedMutexGuard<()> {
        let lock = self.map().entry(key.clone()).or_default().clone();
        lock.lock_owned().await
    }

    /// Forget the entry for `key` if nobody holds or waits for it
    ///
    /// Call after dropping the guard returned by [`KeyLocks::acquire`].
    pub(crate) fn release(&self, key: &CacheKey) {
        let mut map = self.map();
        if map
            .get(key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            map.remove(key);
        }
    }

    #[cfg(test)]
    pub(crate) fn in_flight(&self) -> usize {
        self.map().len()
    }
}
