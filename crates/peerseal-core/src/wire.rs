//! Transport encoding for public keys, signatures, and sealed messages.
//!
//! The wire vocabulary is byte-oriented: compressed SEC1 points for public
//! keys, DER for signatures, and a three-field envelope for sealed
//! messages, each field independently base64-encoded. Decoding failures are
//! a distinct class from decryption failures and are surfaced before any
//! cryptographic processing.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use peerseal_crypto::{NONCE_LEN, SealedMessage, TAG_LEN};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from decoding wire-format values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    /// A field is not valid base64
    #[error("invalid base64 in field {field}")]
    InvalidBase64 {
        /// Name of the malformed field
        field: &'static str,
    },

    /// A fixed-length field decoded to the wrong number of bytes
    #[error("invalid length for field {field}: expected {expected}, got {actual}")]
    InvalidLength {
        /// Name of the malformed field
        field: &'static str,
        /// Expected decoded length in bytes
        expected: usize,
        /// Actual decoded length in bytes
        actual: usize,
    },
}

/// A sealed message in transport form: three independent base64 fields.
///
/// Deserializing from JSON (or any serde format) rejects missing fields, so
/// field absence surfaces as a decoding failure before decryption is ever
/// attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedEnvelope {
    /// Base64-encoded ciphertext
    pub ciphertext: String,
    /// Base64-encoded 12-byte nonce
    pub nonce: String,
    /// Base64-encoded 16-byte authentication tag
    pub tag: String,
}

impl SealedEnvelope {
    /// Encode a sealed message for transport.
    pub fn encode(sealed: &SealedMessage) -> Self {
        Self {
            ciphertext: STANDARD.encode(&sealed.ciphertext),
            nonce: STANDARD.encode(sealed.nonce),
            tag: STANDARD.encode(sealed.tag),
        }
    }

    /// Decode the envelope back into a sealed message.
    ///
    /// Each field is decoded independently; the first malformed field is
    /// reported. No cryptography is touched here.
    ///
    /// # Errors
    ///
    /// - `InvalidBase64`: a field is not valid base64
    /// - `InvalidLength`: nonce or tag decoded to the wrong length
    pub fn decode(&self) -> Result<SealedMessage, WireError> {
        let ciphertext = decode_field("ciphertext", &self.ciphertext)?;
        let nonce = decode_fixed::<NONCE_LEN>("nonce", &self.nonce)?;
        let tag = decode_fixed::<TAG_LEN>("tag", &self.tag)?;

        Ok(SealedMessage { ciphertext, nonce, tag })
    }
}

fn decode_field(field: &'static str, value: &str) -> Result<Vec<u8>, WireError> {
    STANDARD.decode(value).map_err(|_| WireError::InvalidBase64 { field })
}

fn decode_fixed<const N: usize>(field: &'static str, value: &str) -> Result<[u8; N], WireError> {
    let bytes = decode_field(field, value)?;
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| WireError::InvalidLength { field, expected: N, actual })
}

/// Encode a public key (compressed SEC1) or any key blob for transport.
pub fn encode_key(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode a base64 public key received from a peer.
///
/// Only the base64 layer is validated here; whether the bytes are a valid
/// curve point is decided by the key-agreement operation that consumes
/// them.
pub fn decode_key(value: &str) -> Result<Vec<u8>, WireError> {
    decode_field("publicKey", value)
}

/// Encode a DER signature for transport.
pub fn encode_signature(der: &[u8]) -> String {
    STANDARD.encode(der)
}

/// Decode a base64 signature received from a peer.
pub fn decode_signature(value: &str) -> Result<Vec<u8>, WireError> {
    decode_field("signature", value)
}
