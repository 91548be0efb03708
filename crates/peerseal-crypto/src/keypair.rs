//! Role-distinct P-256 key pairs.
//!
//! A device identity is two independent pairs: one for ECDH key agreement,
//! one for ECDSA signing. Both persist as a raw 32-byte scalar and expose
//! their public half as a compressed SEC1 point, but the Rust types are
//! deliberately distinct so a scalar can never serve both roles.
//!
//! The shared persistence surface is the [`PersistedKeyPair`] trait; the
//! key lifecycle in `peerseal-core` is generic over it.

use p256::{
    SecretKey,
    ecdsa::{SigningKey, VerifyingKey},
    elliptic_curve::sec1::ToEncodedPoint,
    pkcs8::EncodePublicKey,
};
use rand_core::OsRng;

use crate::error::CryptoError;

/// Length of a raw P-256 private scalar in bytes
pub const RAW_KEY_LEN: usize = 32;

/// Common persistence surface for both key roles.
///
/// The public key is always the deterministic image of the private scalar;
/// the two halves are never independently settable.
pub trait PersistedKeyPair: Clone + Sized {
    /// Generate a fresh random key pair from OS entropy.
    fn generate() -> Self;

    /// Reconstruct a key pair from a persisted raw scalar.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength`: `bytes` is not exactly [`RAW_KEY_LEN`] long
    /// - `InvalidPrivateKey`: `bytes` does not parse as a scalar for the
    ///   curve (zero, or not reduced modulo the group order)
    fn from_raw(bytes: &[u8]) -> Result<Self, CryptoError>;

    /// Raw scalar encoding for persistence.
    fn to_raw(&self) -> [u8; RAW_KEY_LEN];

    /// Public key as a compressed SEC1 point (33 bytes).
    fn public_key_bytes(&self) -> Vec<u8>;
}

fn parse_scalar(bytes: &[u8]) -> Result<SecretKey, CryptoError> {
    if bytes.len() != RAW_KEY_LEN {
        return Err(CryptoError::InvalidKeyLength {
            expected: RAW_KEY_LEN,
            actual: bytes.len(),
        });
    }
    SecretKey::from_slice(bytes).map_err(|_| CryptoError::InvalidPrivateKey)
}

/// P-256 key pair for ECDH key agreement.
///
/// The private scalar stays inside this type (and its persisted raw form);
/// it is consumed only by [`crate::agreement::derive_session_key`].
#[derive(Clone)]
pub struct AgreementKeyPair {
    secret: SecretKey,
}

impl AgreementKeyPair {
    /// Public half of the pair.
    pub fn public_key(&self) -> p256::PublicKey {
        self.secret.public_key()
    }

    pub(crate) fn secret(&self) -> &SecretKey {
        &self.secret
    }
}

impl PersistedKeyPair for AgreementKeyPair {
    fn generate() -> Self {
        Self { secret: SecretKey::random(&mut OsRng) }
    }

    fn from_raw(bytes: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self { secret: parse_scalar(bytes)? })
    }

    fn to_raw(&self) -> [u8; RAW_KEY_LEN] {
        self.secret.to_bytes().into()
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        self.secret.public_key().to_encoded_point(true).as_bytes().to_vec()
    }
}

impl std::fmt::Debug for AgreementKeyPair {
    // Never print the scalar
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgreementKeyPair").finish_non_exhaustive()
    }
}

/// P-256 key pair for ECDSA signing.
#[derive(Clone)]
pub struct SigningKeyPair {
    signing: SigningKey,
}

impl SigningKeyPair {
    /// Verifying (public) half of the pair.
    pub fn verifying_key(&self) -> &VerifyingKey {
        self.signing.verifying_key()
    }

    /// Public key as SPKI DER, the export format peers expect for
    /// signature verification.
    pub fn public_key_der(&self) -> Result<Vec<u8>, CryptoError> {
        let public = p256::PublicKey::from(self.signing.verifying_key());
        let doc = public
            .to_public_key_der()
            .map_err(|e| CryptoError::SigningFailed { reason: e.to_string() })?;
        Ok(doc.into_vec())
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing
    }
}

impl PersistedKeyPair for SigningKeyPair {
    fn generate() -> Self {
        Self { signing: SigningKey::random(&mut OsRng) }
    }

    fn from_raw(bytes: &[u8]) -> Result<Self, CryptoError> {
        let secret = parse_scalar(bytes)?;
        Ok(Self { signing: SigningKey::from(&secret) })
    }

    fn to_raw(&self) -> [u8; RAW_KEY_LEN] {
        self.signing.to_bytes().into()
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        p256::PublicKey::from(self.signing.verifying_key())
            .to_encoded_point(true)
            .as_bytes()
            .to_vec()
    }
}

impl std::fmt::Debug for SigningKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeyPair").finish_non_exhaustive()
    }
}
