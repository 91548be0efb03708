//! Secure blob store abstraction
//!
//! Trait-based abstraction for the device's secure persistent store
//! (keychain equivalent). The trait is synchronous (no async) to maintain a
//! clean synchronous API design; callers needing non-blocking behavior wrap
//! calls in their own executor.

mod chaotic;
mod error;
mod memory;
mod redb;

use serde::{Deserialize, Serialize};

pub use self::redb::RedbStore;
pub use chaotic::ChaoticStore;
pub use error::StoreError;
pub use memory::MemoryStore;

/// Condition under which a persisted secret may be read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessPolicy {
    /// Readable only once the device has been unlocked at least once since
    /// boot. The policy for all key material.
    AfterFirstUnlock,
    /// Readable unconditionally.
    Always,
}

/// A persisted record: the blob plus the policy it was stored under.
///
/// Serialized as CBOR by durable backends so the policy survives restarts
/// alongside the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Access policy the blob was stored under.
    pub policy: AccessPolicy,
    /// The opaque blob.
    pub bytes: Vec<u8>,
}

/// Capability interface to the secure blob store.
///
/// Must be Clone (shared by the key manager and its callers), Send + Sync
/// (thread-safe), and synchronous. Implementations typically share internal
/// state via Arc, so clones access the same underlying store.
///
/// The store owns no cryptography: blobs are opaque bytes under string
/// tags. Absence is not an error; `get` distinguishes a missing record
/// (`Ok(None)`) from a read failure (`Err`), and callers must never treat
/// the two alike.
pub trait SecretStore: Clone + Send + Sync + 'static {
    /// Store a blob under `tag`, replacing any existing record.
    fn put(&self, tag: &str, bytes: &[u8], policy: AccessPolicy) -> Result<(), StoreError>;

    /// Load the blob stored under `tag`, or `None` if no record exists.
    ///
    /// # Errors
    ///
    /// - `Locked`: the record's policy forbids reading before the device
    ///   has been unlocked
    /// - `Io` / `Serialization`: the backend failed or the record is
    ///   corrupt at the storage layer
    fn get(&self, tag: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Delete the record under `tag`. Deleting an absent tag is a no-op.
    fn delete(&self, tag: &str) -> Result<(), StoreError>;
}
