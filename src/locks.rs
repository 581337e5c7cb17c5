//! Per-key async locks.
//!
//! Two requests for the same report number must not interleave their
//! remove/write/rename sequence, while requests for different numbers run
//! freely.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Map of lazily created async mutexes, one per key.
///
/// The outer map uses a sync [`Mutex`] since its critical section never
/// awaits. Idle entries are pruned on every acquisition.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    slots: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

/// Held lock for one key. Dropping it releases the key.
#[derive(Debug)]
pub struct KeyGuard {
    _guard: OwnedMutexGuard<()>,
}

impl KeyedLocks {
    /// Empty lock map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`.
    pub async fn lock(&self, key: &str) -> KeyGuard {
        let slot = self.slot(key);
        KeyGuard {
            _guard: slot.lock_owned().await,
        }
    }

    fn slot(&self, key: &str) -> Arc<AsyncMutex<()>> {
        let mut slots = match self.slots.lock() {
            Ok(map) => map,
            Err(poisoned) => poisoned.into_inner(),
        };
        // An entry referenced only by the map has no holder and no waiter.
        slots.retain(|k, v| k == key || Arc::strong_count(v) > 1);
        Arc::clone(
            slots
                .entry(key.to_owned())
                .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
        )
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        match self.slots.lock() {
            Ok(map) => map.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Whether no key is tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
