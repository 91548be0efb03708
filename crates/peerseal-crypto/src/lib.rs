//! Peerseal Cryptographic Primitives
//!
//! Cryptographic building blocks for Peerseal. Pure functions and value
//! types with no I/O or persistence; key lifecycles and storage live in
//! `peerseal-core`.
//!
//! # Key Roles
//!
//! A device identity is two independent P-256 key pairs:
//!
//! ```text
//! AgreementKeyPair (ECDH)          SigningKeyPair (ECDSA)
//!        │                                │
//!        ▼                                ▼
//! Diffie-Hellman with peer          DER signatures over
//!        │                          arbitrary payloads
//!        ▼
//! HKDF-SHA256 → SessionKey (32 bytes)
//!        │
//!        ▼
//! AES-256-GCM seal/open → SealedMessage
//! ```
//!
//! The two pairs may share a curve but are never interchangeable: signing
//! and key agreement are not safely composable on a shared scalar, so the
//! roles are distinct Rust types.
//!
//! # Security
//!
//! Authenticity:
//! - AES-256-GCM provides tamper-proof encryption (16-byte tag)
//! - A failed authentication tag rejects the message with no partial
//!   plaintext ever surfaced
//!
//! Nonce freshness:
//! - [`aead::seal`] draws a fresh random 12-byte nonce from the OS on every
//!   call; callers cannot cause nonce reuse by construction
//!
//! Key hygiene:
//! - [`SessionKey`] zeroizes its bytes on drop
//! - Private scalars live inside `p256` types, which zeroize on drop

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod aead;
pub mod agreement;
mod error;
pub mod keypair;
pub mod signing;

pub use aead::{KEY_LEN, NONCE_LEN, SealedMessage, TAG_LEN};
pub use agreement::{SessionKey, derive_session_key};
pub use error::CryptoError;
pub use keypair::{AgreementKeyPair, PersistedKeyPair, RAW_KEY_LEN, SigningKeyPair};
