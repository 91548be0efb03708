//! Store error types.
//!
//! Defines errors that can occur against the secure blob store:
//! - `Locked`: the record exists but its access policy forbids reading yet
//! - `Serialization`: a stored record failed to encode/decode
//! - `Io`: underlying storage system errors
//!
//! Absence of a record is NOT an error; it is the `Ok(None)` arm of
//! [`super::SecretStore::get`]. Keeping read failures out of that arm is
//! what lets the key manager avoid silently minting a new identity when the
//! store merely hiccuped.

use thiserror::Error;

/// Errors that can occur during secure-store operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Record exists but is not readable before the first device unlock
    #[error("record locked: {tag} requires first unlock")]
    Locked {
        /// Tag of the locked record
        tag: String,
    },

    /// Serialization or deserialization of a stored record failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error (file system, database, etc.)
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}
