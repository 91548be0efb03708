//! In-memory secure store for testing and simulation.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use super::{AccessPolicy, SecretStore, StoreError, StoredRecord};

/// In-memory store implementation for testing and simulation
///
/// Uses a `HashMap` wrapped in Arc<Mutex<>> to allow Clone and concurrent
/// access. Thread-safe through Mutex, but uses `lock().expect()` which will
/// panic if the mutex is poisoned - acceptable for test code.
///
/// Models the device-unlock gate: records stored under
/// [`AccessPolicy::AfterFirstUnlock`] are readable only after
/// [`unlock`](Self::unlock) has been called. Stores start unlocked; use
/// [`locked`](Self::locked) to simulate reads before the first unlock.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

struct MemoryStoreInner {
    records: HashMap<String, StoredRecord>,
    /// Whether the device has been unlocked at least once since "boot"
    unlocked: bool,
    /// Total `put` calls, for asserting single-generation invariants
    put_count: usize,
}

impl MemoryStore {
    /// Create a new empty store in the post-first-unlock state.
    pub fn new() -> Self {
        Self::with_unlock_state(true)
    }

    /// Create a store simulating a device that has not yet been unlocked.
    pub fn locked() -> Self {
        Self::with_unlock_state(false)
    }

    fn with_unlock_state(unlocked: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryStoreInner {
                records: HashMap::new(),
                unlocked,
                put_count: 0,
            })),
        }
    }

    /// Mark the device as unlocked, making `AfterFirstUnlock` records
    /// readable.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned (a thread panicked while
    /// holding the lock). This is acceptable for test/simulation code.
    #[allow(clippy::expect_used)]
    pub fn unlock(&self) {
        self.inner.lock().expect("Mutex poisoned").unlocked = true;
    }

    /// Number of stored records.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. Acceptable for test code.
    #[allow(clippy::expect_used)]
    pub fn record_count(&self) -> usize {
        self.inner.lock().expect("Mutex poisoned").records.len()
    }

    /// Total number of `put` calls since creation.
    ///
    /// Used by tests to assert that lazy initialization generated key
    /// material at most once.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. Acceptable for test code.
    #[allow(clippy::expect_used)]
    pub fn put_count(&self) -> usize {
        self.inner.lock().expect("Mutex poisoned").put_count
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for MemoryStore {
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. Acceptable for test code.
    #[allow(clippy::expect_used)]
    fn put(&self, tag: &str, bytes: &[u8], policy: AccessPolicy) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("Mutex poisoned");
        inner.put_count += 1;
        inner
            .records
            .insert(tag.to_string(), StoredRecord { policy, bytes: bytes.to_vec() });
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. Acceptable for test code.
    #[allow(clippy::expect_used)]
    fn get(&self, tag: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let inner = self.inner.lock().expect("Mutex poisoned");

        let Some(record) = inner.records.get(tag) else {
            return Ok(None);
        };

        if record.policy == AccessPolicy::AfterFirstUnlock && !inner.unlocked {
            return Err(StoreError::Locked { tag: tag.to_string() });
        }

        Ok(Some(record.bytes.clone()))
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. Acceptable for test code.
    #[allow(clippy::expect_used)]
    fn delete(&self, tag: &str) -> Result<(), StoreError> {
        self.inner.lock().expect("Mutex poisoned").records.remove(tag);
        Ok(())
    }
}
