//! Key material layer over the secure store.
//!
//! Thin specialization of [`SecretStore`] for private-key and session-key
//! blobs. Owns no cryptography: whether the bytes parse as a valid key is
//! the caller's responsibility.

use crate::store::{AccessPolicy, SecretStore, StoreError};

/// Fixed-role store for key material, pinning the access policy every
/// record is written under.
#[derive(Clone)]
pub struct KeyMaterialStore<S: SecretStore> {
    store: S,
    policy: AccessPolicy,
}

impl<S: SecretStore> KeyMaterialStore<S> {
    /// Wrap a secret store. All key material is stored readable only after
    /// the first device unlock.
    pub fn new(store: S) -> Self {
        Self { store, policy: AccessPolicy::AfterFirstUnlock }
    }

    /// Idempotently replace the record for `tag` with `bytes`.
    ///
    /// Delete-if-present then insert: never leaves two records for one tag.
    /// A crash between the two store calls loses the record; the next start
    /// then observes a legitimate absence and regenerates. Acceptable for a
    /// session secret (re-derivable) and tolerated for identity keys.
    pub fn save(&self, tag: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.store.delete(tag)?;
        self.store.put(tag, bytes, self.policy)
    }

    /// Most recently saved bytes for `tag`, or `None` if no record exists.
    ///
    /// Absence is not an error. A read failure (locked record, backend
    /// fault) propagates as `Err` and must never be treated as absence.
    pub fn load(&self, tag: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.store.get(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn save_then_load() {
        let material = KeyMaterialStore::new(MemoryStore::new());

        material.save("tag", b"scalar bytes").unwrap();
        assert_eq!(material.load("tag").unwrap(), Some(b"scalar bytes".to_vec()));
    }

    #[test]
    fn load_absent_is_none_not_error() {
        let material = KeyMaterialStore::new(MemoryStore::new());
        assert_eq!(material.load("missing").unwrap(), None);
    }

    #[test]
    fn save_replaces_previous_record() {
        let store = MemoryStore::new();
        let material = KeyMaterialStore::new(store.clone());

        material.save("tag", b"first").unwrap();
        material.save("tag", b"second").unwrap();

        assert_eq!(material.load("tag").unwrap(), Some(b"second".to_vec()));
        assert_eq!(store.record_count(), 1);
    }

    #[test]
    fn material_is_stored_under_first_unlock_policy() {
        let store = MemoryStore::locked();
        let material = KeyMaterialStore::new(store.clone());

        material.save("tag", b"scalar bytes").unwrap();

        // Unreadable before the first unlock, and distinguishable from absence
        assert!(material.load("tag").is_err());
        store.unlock();
        assert_eq!(material.load("tag").unwrap(), Some(b"scalar bytes".to_vec()));
    }
}
