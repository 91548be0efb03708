//! Error types for cryptographic operations

use thiserror::Error;

/// Errors from cryptographic primitives
#[derive(Debug, Error)]
pub enum CryptoError {
    /// ECDH failed: the peer public key is not a valid point on the curve,
    /// or the exchange itself failed
    #[error("key agreement failed: {reason}")]
    KeyAgreementFailed {
        /// Reason the agreement was rejected
        reason: String,
    },

    /// Persisted private-key bytes do not parse as a valid scalar
    #[error("invalid private key material")]
    InvalidPrivateKey,

    /// Key material has the wrong length
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// AEAD sealing failed (malformed key or internal randomness failure)
    #[error("encryption failed: {reason}")]
    EncryptionFailed {
        /// Reason for the encryption failure
        reason: String,
    },

    /// AEAD opening failed (authentication tag mismatch or malformed
    /// framing). Deliberately carries no detail about how far decryption
    /// progressed.
    #[error("decryption failed: {reason}")]
    DecryptionFailed {
        /// Reason for the decryption failure
        reason: String,
    },

    /// ECDSA signature generation failed
    #[error("signing failed: {reason}")]
    SigningFailed {
        /// Reason for the signing failure
        reason: String,
    },
}

impl CryptoError {
    /// Returns true if this error indicates tampered or forged input.
    ///
    /// Adversarial errors are expected in normal operation (an attacker can
    /// always send garbage); the rest indicate local misuse or corruption.
    pub fn is_adversarial(&self) -> bool {
        matches!(self, Self::DecryptionFailed { .. } | Self::KeyAgreementFailed { .. })
    }
}
