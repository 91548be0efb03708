//! Peerseal key and session manager
//!
//! Owns a device's long-lived P-256 key pairs, establishes a shared
//! symmetric secret with a remote peer via ECDH, and uses that secret
//! (plus the separate signing pair) to seal, open, sign, and verify byte
//! payloads — with all key material persisted through a pluggable secure
//! blob store so identity survives process restarts.
//!
//! # Lifecycle
//!
//! ```text
//! SecretStore (memory / redb / ...)
//!        │
//!        ▼
//! KeyManager ── get-or-create ──► AgreementKeyPair, SigningKeyPair
//!        │
//!        ├── agreement_public_key() ──► peer (transport is external)
//!        ├── establish_session(peer key) ──► persisted SessionKey
//!        ├── seal / open ──► SealedMessage / SealedEnvelope
//!        └── sign / verify ──► DER signatures
//! ```
//!
//! The transport that carries public keys, signatures, and envelopes
//! to/from the peer is an external collaborator: this crate only encodes
//! and decodes the byte/base64/DER vocabulary it must interoperate with.
//!
//! # Failure policy
//!
//! Absence of a persisted record is the first-run path and triggers
//! generation; a *read error* or an unparsable record never does. Invalid
//! peer signatures are a boolean `false`, not an error; everything else
//! surfaces as a typed [`KeyError`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
pub mod manager;
pub mod material;
pub mod store;
pub mod wire;

pub use error::KeyError;
pub use manager::{KeyManager, KeyTags};
pub use material::KeyMaterialStore;
pub use store::{AccessPolicy, ChaoticStore, MemoryStore, RedbStore, SecretStore, StoreError};
pub use wire::{SealedEnvelope, WireError};
