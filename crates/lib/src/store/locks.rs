//! Per-owner write serialization for user records.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Table of one mutex per user name.
///
/// Every read-modify-write of a user record runs while holding that user's mutex, so
/// concurrent index updates for the same owner are applied one after another instead of
/// overwriting each other. Different owners never contend.
///
/// An entry lives only while some thread holds or waits on it; the last one out removes
/// it, so the table stays as small as the number of owners currently being written.
#[derive(Debug, Default)]
pub(crate) struct OwnerLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl OwnerLocks {
    fn lock_for(&self, owner: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(owner.to_string()).or_default())
    }

    /// Drops `owner`'s entry if `lock` is it and nobody else holds a handle.
    ///
    /// Handles are only cloned under the table mutex, so two strong references (the
    /// table's and ours) seen here means no other thread is holding or waiting.
    fn release(&self, owner: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if Arc::strong_count(&lock) == 2
            && locks.get(owner).is_some_and(|entry| Arc::ptr_eq(entry, &lock))
        {
            locks.remove(owner);
        }
    }

    /// Runs `f` while holding `owner`'s mutex.
    ///
    /// Not reentrant: `f` must not take the same owner again.
    ///
    /// The mutex guards no data of its own, so a lock poisoned by a panicking writer is
    /// simply reclaimed.
    pub(crate) fn with_owner<T>(&self, owner: &str, f: impl FnOnce() -> T) -> T {
        let lock = self.lock_for(owner);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };
        self.release(owner, lock);
        result
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
