//! The key and session manager.
//!
//! An explicit context object constructed once at process start. It owns
//! the two device key pairs (agreement and signing), lazily loading or
//! generating each exactly once per process lifetime, and manages the
//! session secret derived from an ECDH exchange with a peer.
//!
//! # Concurrency
//!
//! Each key pair sits behind its own mutex-guarded slot, so concurrent
//! first accesses serialize and at most one generation happens per tag per
//! process. Session establishment, sealing, and signing touch disjoint
//! persisted tags and already-initialized keys, so they need no further
//! coordination.

use std::sync::{Mutex, PoisonError};

use peerseal_crypto::{
    AgreementKeyPair, PersistedKeyPair, SealedMessage, SessionKey, SigningKeyPair, aead,
    derive_session_key, signing,
};
use tracing::{debug, warn};

use crate::{
    error::KeyError,
    material::KeyMaterialStore,
    store::SecretStore,
    wire::SealedEnvelope,
};

/// Tags the three key-material records are persisted under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTags {
    /// Tag for the ECDH agreement key pair
    pub agreement: String,
    /// Tag for the ECDSA signing key pair
    pub signing: String,
    /// Tag for the derived session secret
    pub session: String,
}

impl Default for KeyTags {
    fn default() -> Self {
        Self {
            agreement: "peerseal.agreement-key".to_string(),
            signing: "peerseal.signing-key".to_string(),
            session: "peerseal.session-secret".to_string(),
        }
    }
}

/// Device key and session manager.
///
/// Construct one per process and share it (e.g. behind an `Arc`); there is
/// no ambient global instance.
pub struct KeyManager<S: SecretStore> {
    material: KeyMaterialStore<S>,
    tags: KeyTags,
    agreement: Mutex<Option<AgreementKeyPair>>,
    signing: Mutex<Option<SigningKeyPair>>,
}

impl<S: SecretStore> KeyManager<S> {
    /// Create a manager over the given secure store with default tags.
    pub fn new(store: S) -> Self {
        Self::with_tags(store, KeyTags::default())
    }

    /// Create a manager with explicit record tags.
    pub fn with_tags(store: S, tags: KeyTags) -> Self {
        Self {
            material: KeyMaterialStore::new(store),
            tags,
            agreement: Mutex::new(None),
            signing: Mutex::new(None),
        }
    }

    /// Load-or-generate under the slot's lock.
    ///
    /// Holding the lock across the whole load/generate/save sequence is the
    /// point: two concurrent first callers must not both observe "absent"
    /// and both generate, so at most one generation occurs per tag.
    fn get_or_create<K: PersistedKeyPair>(
        &self,
        slot: &Mutex<Option<K>>,
        tag: &str,
    ) -> Result<K, KeyError> {
        let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(pair) = guard.as_ref() {
            return Ok(pair.clone());
        }

        let pair = match self.material.load(tag)? {
            Some(bytes) => {
                // A record that exists but does not reconstruct is surfaced,
                // never silently replaced: a corrupted record must not look
                // like a first run and rotate the device identity.
                let pair = K::from_raw(&bytes).map_err(|e| {
                    warn!(tag, "persisted key material unusable");
                    KeyError::Retrieval { tag: tag.to_string(), reason: e.to_string() }
                })?;
                debug!(tag, "loaded persisted key pair");
                pair
            },
            None => {
                let pair = K::generate();
                self.material.save(tag, &pair.to_raw())?;
                debug!(tag, "generated and persisted new key pair");
                pair
            },
        };

        *guard = Some(pair.clone());
        Ok(pair)
    }

    /// The device agreement key pair, loading or generating it on first
    /// access.
    pub fn agreement_key_pair(&self) -> Result<AgreementKeyPair, KeyError> {
        self.get_or_create(&self.agreement, &self.tags.agreement)
    }

    /// The device signing key pair, loading or generating it on first
    /// access.
    pub fn signing_key_pair(&self) -> Result<SigningKeyPair, KeyError> {
        self.get_or_create(&self.signing, &self.tags.signing)
    }

    /// Agreement public key as a compressed SEC1 point, the form peers
    /// consume for key agreement.
    pub fn agreement_public_key(&self) -> Result<Vec<u8>, KeyError> {
        Ok(self.agreement_key_pair()?.public_key_bytes())
    }

    /// Signing public key as a compressed SEC1 point.
    pub fn signing_public_key(&self) -> Result<Vec<u8>, KeyError> {
        Ok(self.signing_key_pair()?.public_key_bytes())
    }

    /// Signing public key as SPKI DER, the export format for verifiers
    /// that expect a self-describing key encoding.
    pub fn signing_public_key_der(&self) -> Result<Vec<u8>, KeyError> {
        Ok(self.signing_key_pair()?.public_key_der()?)
    }

    /// Derive a session key from a peer's public key (SEC1 bytes) and
    /// persist it, superseding any previously established session secret.
    pub fn establish_session(&self, peer_public: &[u8]) -> Result<SessionKey, KeyError> {
        let local = self.agreement_key_pair()?;
        let key = derive_session_key(&local, peer_public)?;

        self.material.save(&self.tags.session, key.as_bytes())?;
        debug!("session secret established");

        Ok(key)
    }

    /// Persist an externally supplied session secret (e.g. one the peer
    /// derived and transmitted out of band), superseding any previous one.
    pub fn import_session_key(&self, bytes: &[u8]) -> Result<(), KeyError> {
        // Validate the length before persisting; the store itself won't.
        let key = SessionKey::from_bytes(bytes)?;
        self.material.save(&self.tags.session, key.as_bytes())?;
        debug!("session secret imported");
        Ok(())
    }

    /// The current session key, or `None` if no session has been
    /// established on this device.
    pub fn session_key(&self) -> Result<Option<SessionKey>, KeyError> {
        let Some(bytes) = self.material.load(&self.tags.session)? else {
            return Ok(None);
        };

        let key = SessionKey::from_bytes(&bytes).map_err(|e| KeyError::Retrieval {
            tag: self.tags.session.clone(),
            reason: e.to_string(),
        })?;

        Ok(Some(key))
    }

    fn current_session_key(&self) -> Result<SessionKey, KeyError> {
        self.session_key()?.ok_or(KeyError::NoSessionKey)
    }

    /// Seal a payload with the stored session key.
    pub fn seal(&self, plaintext: &[u8]) -> Result<SealedMessage, KeyError> {
        let key = self.current_session_key()?;
        Ok(aead::seal(plaintext, &key, &[])?)
    }

    /// Open a sealed payload with the stored session key.
    pub fn open(&self, sealed: &SealedMessage) -> Result<Vec<u8>, KeyError> {
        let key = self.current_session_key()?;
        Ok(aead::open(sealed, &key, &[])?)
    }

    /// Seal a payload and encode it for transport in one step.
    pub fn seal_envelope(&self, plaintext: &[u8]) -> Result<SealedEnvelope, KeyError> {
        Ok(SealedEnvelope::encode(&self.seal(plaintext)?))
    }

    /// Decode a transport envelope and open it with the stored session key.
    ///
    /// Decoding failures (malformed base64, wrong field lengths) surface as
    /// [`KeyError::Decoding`], distinct from the [`KeyError::Crypto`]
    /// decryption failure of a well-formed but tampered envelope.
    pub fn open_envelope(&self, envelope: &SealedEnvelope) -> Result<Vec<u8>, KeyError> {
        let sealed = envelope.decode()?;
        self.open(&sealed)
    }

    /// Sign a payload with the device signing key, returning a DER-encoded
    /// ECDSA signature.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, KeyError> {
        let pair = self.signing_key_pair()?;
        Ok(signing::sign(&pair, message)?)
    }

    /// Verify a DER signature over `message` against this device's own
    /// signing key. For peer signatures use
    /// [`peerseal_crypto::signing::verify`] with the peer's public key.
    pub fn verify(&self, message: &[u8], signature_der: &[u8]) -> Result<bool, KeyError> {
        let pair = self.signing_key_pair()?;
        Ok(signing::verify_with_key(pair.verifying_key(), message, signature_der))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn repeated_access_returns_same_key() {
        let manager = KeyManager::new(MemoryStore::new());

        let first = manager.agreement_public_key().unwrap();
        let second = manager.agreement_public_key().unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn key_is_generated_once_per_process() {
        let store = MemoryStore::new();
        let manager = KeyManager::new(store.clone());

        let puts_before = store.put_count();
        let _ = manager.agreement_key_pair().unwrap();
        let _ = manager.agreement_key_pair().unwrap();
        let _ = manager.agreement_key_pair().unwrap();

        assert_eq!(store.put_count() - puts_before, 1, "exactly one save for three accesses");
    }

    #[test]
    fn agreement_and_signing_identities_are_independent() {
        let manager = KeyManager::new(MemoryStore::new());

        let agreement = manager.agreement_public_key().unwrap();
        let signing = manager.signing_public_key().unwrap();

        assert_ne!(agreement, signing);
    }

    #[test]
    fn session_key_absent_before_establishment() {
        let manager = KeyManager::new(MemoryStore::new());
        assert!(manager.session_key().unwrap().is_none());
    }

    #[test]
    fn seal_without_session_fails() {
        let manager = KeyManager::new(MemoryStore::new());

        let result = manager.seal(b"payload");
        assert!(matches!(result, Err(KeyError::NoSessionKey)));
    }

    #[test]
    fn establish_session_persists_the_key() {
        let store = MemoryStore::new();
        let manager = KeyManager::new(store.clone());
        let peer = KeyManager::new(MemoryStore::new());

        let derived = manager.establish_session(&peer.agreement_public_key().unwrap()).unwrap();

        let loaded = manager.session_key().unwrap().unwrap();
        assert_eq!(loaded.as_bytes(), derived.as_bytes());
    }

    #[test]
    fn new_session_supersedes_previous() {
        let manager = KeyManager::new(MemoryStore::new());
        let peer_a = KeyManager::new(MemoryStore::new());
        let peer_b = KeyManager::new(MemoryStore::new());

        manager.establish_session(&peer_a.agreement_public_key().unwrap()).unwrap();
        let second = manager.establish_session(&peer_b.agreement_public_key().unwrap()).unwrap();

        let loaded = manager.session_key().unwrap().unwrap();
        assert_eq!(loaded.as_bytes(), second.as_bytes());
    }

    #[test]
    fn import_session_key_validates_length() {
        let manager = KeyManager::new(MemoryStore::new());

        assert!(manager.import_session_key(&[0u8; 16]).is_err());
        assert!(manager.import_session_key(&[7u8; 32]).is_ok());
        assert!(manager.session_key().unwrap().is_some());
    }

    #[test]
    fn corrupt_session_record_is_a_retrieval_error() {
        let store = MemoryStore::new();
        let manager = KeyManager::new(store.clone());

        // Simulate a truncated persisted secret
        store
            .put("peerseal.session-secret", &[1u8; 7], crate::store::AccessPolicy::Always)
            .unwrap();

        let result = manager.session_key();
        assert!(matches!(result, Err(KeyError::Retrieval { .. })));
    }

    #[test]
    fn sign_and_self_verify() {
        let manager = KeyManager::new(MemoryStore::new());

        let signature = manager.sign(b"message").unwrap();
        assert!(manager.verify(b"message", &signature).unwrap());
        assert!(!manager.verify(b"other message", &signature).unwrap());
        assert!(!manager.verify(b"message", b"garbage").unwrap());
    }

    #[test]
    fn custom_tags_are_honored() {
        let store = MemoryStore::new();
        let tags = KeyTags {
            agreement: "test.agree".to_string(),
            signing: "test.sign".to_string(),
            session: "test.session".to_string(),
        };
        let manager = KeyManager::with_tags(store.clone(), tags);

        let _ = manager.agreement_key_pair().unwrap();
        assert!(store.get("test.agree").unwrap().is_some());
        assert!(store.get("peerseal.agreement-key").unwrap().is_none());
    }
}
