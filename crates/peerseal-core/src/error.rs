//! Error types for the key and session manager.
//!
//! Strongly-typed errors composed over the store, crypto, and wire layers.
//! The propagation policy: store read errors and cryptographic failures
//! surface to the immediate caller as typed failures; the manager never
//! substitutes fresh key material on a read error (only on confirmed
//! absence, the documented first-run path).

use peerseal_crypto::CryptoError;
use thiserror::Error;

use crate::{store::StoreError, wire::WireError};

/// Errors from key manager operations.
#[derive(Debug, Error)]
pub enum KeyError {
    /// A persisted record exists but could not be used: the store read
    /// failed, or the bytes do not reconstruct a valid key.
    ///
    /// Deliberately distinct from absence: a corrupted or unreadable record
    /// must not silently rotate the device identity. The caller decides
    /// whether to delete the record and regenerate.
    #[error("key retrieval failed for {tag}: {reason}")]
    Retrieval {
        /// Tag of the unusable record
        tag: String,
        /// Why the record could not be used
        reason: String,
    },

    /// A sealing or opening operation needs a session secret but none has
    /// been established or imported.
    #[error("no session key established")]
    NoSessionKey,

    /// Secure store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Cryptographic operation failure
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Wire decoding failure (malformed base64 or field shape), surfaced
    /// before any cryptographic processing
    #[error(transparent)]
    Decoding(#[from] WireError),
}
