//! Authenticated encryption with AES-256-GCM
//!
//! Seals byte payloads into `{ciphertext, nonce, tag}` triples and opens
//! them again. A fresh random 12-byte nonce is drawn from the OS on every
//! seal call; nonce freshness is a property of this module, not a caller
//! obligation.
//!
//! # Security
//!
//! - 256-bit keys, 128-bit authentication tag
//! - Any bit flip in ciphertext, nonce, or tag fails authentication
//! - On authentication failure no partial plaintext is returned or logged;
//!   the failure is indistinguishable from any other tag mismatch
//! - Associated data, when supplied, is bound into the tag; both sides must
//!   pass identical bytes

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit, Payload},
};
use rand_core::{OsRng, RngCore};

use crate::{agreement::SessionKey, error::CryptoError};

/// Symmetric key length in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// GCM nonce length in bytes
pub const NONCE_LEN: usize = 12;

/// GCM authentication tag length in bytes
pub const TAG_LEN: usize = 16;

/// A sealed payload: ciphertext plus the nonce and tag needed to open it.
///
/// The three parts travel independently on the wire (each base64-encoded by
/// `peerseal-core`), so the tag is kept separate from the ciphertext rather
/// than appended to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedMessage {
    /// Encrypted payload, same length as the plaintext
    pub ciphertext: Vec<u8>,
    /// The 12-byte GCM nonce, fresh per seal call
    pub nonce: [u8; NONCE_LEN],
    /// The 16-byte authentication tag
    pub tag: [u8; TAG_LEN],
}

/// Seal a plaintext under the session key.
///
/// `aad` is bound into the authentication tag without being encrypted;
/// pass `&[]` for wire compatibility with peers that bind none.
///
/// # Errors
///
/// - `EncryptionFailed`: OS randomness failure while drawing the nonce, or
///   an internal cipher failure
pub fn seal(plaintext: &[u8], key: &SessionKey, aad: &[u8]) -> Result<SealedMessage, CryptoError> {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| CryptoError::EncryptionFailed { reason: format!("nonce randomness: {e}") })?;

    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let mut ciphertext = cipher
        .encrypt(&Nonce::from(nonce), Payload { msg: plaintext, aad })
        .map_err(|_| CryptoError::EncryptionFailed { reason: "AES-GCM seal".to_string() })?;

    // aes-gcm appends the tag; the wire format carries it separately
    let tag_bytes = ciphertext.split_off(ciphertext.len() - TAG_LEN);
    let Ok(tag) = tag_bytes.as_slice().try_into() else {
        unreachable!("split_off yields exactly TAG_LEN bytes");
    };

    Ok(SealedMessage { ciphertext, nonce, tag })
}

/// Open a sealed message under the session key.
///
/// `aad` must match the bytes bound at seal time.
///
/// # Errors
///
/// - `DecryptionFailed`: authentication tag mismatch from any tampering of
///   ciphertext, nonce, tag, or associated data, or a wrong key
pub fn open(sealed: &SealedMessage, key: &SessionKey, aad: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let mut framed = Vec::with_capacity(sealed.ciphertext.len() + TAG_LEN);
    framed.extend_from_slice(&sealed.ciphertext);
    framed.extend_from_slice(&sealed.tag);

    cipher
        .decrypt(&Nonce::from(sealed.nonce), Payload { msg: &framed, aad })
        .map_err(|_| CryptoError::DecryptionFailed { reason: "authentication failed".to_string() })
}
