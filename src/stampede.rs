//! Stampede Guard
//!
//! Per-key mutual exclusion for cache fills: under N concurrent identical
//! requests against a cold cache, exactly one caller computes while the rest
//! wait and then observe the cached result.
//!
//! Lock slots are created on first contention for a key and removed as soon
//! as no holder or waiter remains, so a long-running process does not
//! accumulate one mutex per distinct input. Waiter accounting is RAII-based:
//! a caller cancelled while queued still deregisters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug)]
struct LockSlot {
    mutex: Arc<AsyncMutex<()>>,
    /// Holders plus queued waiters. Mutated only under the registry lock.
    waiters: AtomicUsize,
}

/// Registry of per-key async mutexes.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    registry: Mutex<HashMap<String, Arc<LockSlot>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<String, Arc<LockSlot>>> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Acquire the exclusive lock for `key`, creating its slot on demand.
    ///
    /// The returned guard releases the lock on drop and removes the slot
    /// once no other caller holds or awaits it.
    pub async fn lock(&self, key: &str) -> KeyedGuard<'_> {
        let slot = {
            let mut registry = self.registry();
            let slot = registry
                .entry(key.to_string())
                .or_insert_with(|| {
                    Arc::new(LockSlot {
                        mutex: Arc::new(AsyncMutex::new(())),
                        waiters: AtomicUsize::new(0),
                    })
                })
                .clone();
            slot.waiters.fetch_add(1, Ordering::Relaxed);
            slot
        };

        // Registered before the await so cancellation while queued still
        // runs the deregistration in Drop.
        let registration = WaiterRegistration {
            locks: self,
            key: key.to_string(),
            slot: Arc::clone(&slot),
        };

        let guard = Arc::clone(&slot.mutex).lock_owned().await;

        KeyedGuard {
            _guard: guard,
            _registration: registration,
        }
    }

    /// Number of keys currently under contention.
    pub fn len(&self) -> usize {
        self.registry().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct WaiterRegistration<'a> {
    locks: &'a KeyedLocks,
    key: String,
    slot: Arc<LockSlot>,
}

impl Drop for WaiterRegistration<'_> {
    fn drop(&mut self) {
        let mut registry = self.locks.registry();
        if self.slot.waiters.fetch_sub(1, Ordering::Relaxed) == 1 {
            // Remove only if the registry still maps this key to our slot
            // and nobody re-registered while we took the registry lock.
            if let Some(current) = registry.get(&self.key) {
                if Arc::ptr_eq(current, &self.slot) && current.waiters.load(Ordering::Relaxed) == 0
                {
                    registry.remove(&self.key);
                }
            }
        }
    }
}

/// Exclusive hold on one key. Field order matters: the mutex guard is
/// released before the waiter registration is dropped.
pub struct KeyedGuard<'a> {
    _guard: OwnedMutexGuard<()>,
    _registration: WaiterRegistration<'a>,
}
