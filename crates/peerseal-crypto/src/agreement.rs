//! Session-key derivation via ECDH and HKDF
//!
//! One Diffie-Hellman exchange between the local agreement scalar and the
//! peer's public point, followed by HKDF-SHA256 (empty salt, empty info)
//! over the shared x-coordinate, yields a uniform 32-byte [`SessionKey`].
//! Derivation is deterministic: the same scalar and peer point always
//! produce the same key on both sides of the exchange.

use hkdf::Hkdf;
use p256::{PublicKey, ecdh};
use sha2::Sha256;
use zeroize::Zeroize;

use crate::{aead::KEY_LEN, error::CryptoError, keypair::AgreementKeyPair};

/// A symmetric session key derived from one ECDH exchange.
///
/// Used for AES-256-GCM sealing until superseded by a newly established
/// session. Zeroized on drop.
#[derive(Clone)]
pub struct SessionKey {
    key: [u8; KEY_LEN],
}

impl SessionKey {
    /// Wrap raw key bytes loaded from the secret store.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength`: `bytes` is not exactly [`KEY_LEN`] long
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let key: [u8; KEY_LEN] = bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: KEY_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self { key })
    }

    /// Raw key bytes for persistence.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }
}

impl Drop for SessionKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl std::fmt::Debug for SessionKey {
    // Never print key material
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKey").finish_non_exhaustive()
    }
}

/// Derive a session key from the local agreement pair and a peer's public
/// point (SEC1 encoding, compressed or uncompressed).
///
/// # Errors
///
/// - `KeyAgreementFailed`: the peer bytes are not a valid point on P-256
///   (off-curve, identity, or malformed encoding)
pub fn derive_session_key(
    local: &AgreementKeyPair,
    peer_public: &[u8],
) -> Result<SessionKey, CryptoError> {
    let peer = PublicKey::from_sec1_bytes(peer_public).map_err(|_| {
        CryptoError::KeyAgreementFailed { reason: "invalid peer public key".to_string() }
    })?;

    let shared = ecdh::diffie_hellman(local.secret().to_nonzero_scalar(), peer.as_affine());

    // HKDF-SHA256 with empty salt and empty info over the shared
    // x-coordinate. Both sides must use identical parameters.
    let hkdf = Hkdf::<Sha256>::new(None, shared.raw_secret_bytes());

    let mut key = [0u8; KEY_LEN];
    let Ok(()) = hkdf.expand(&[], &mut key) else {
        unreachable!("32 bytes is a valid HKDF-SHA256 output length");
    };

    Ok(SessionKey { key })
}

#[cfg(test)]
mod tests {
    use crate::keypair::PersistedKeyPair;

    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let local = AgreementKeyPair::generate();
        let peer = AgreementKeyPair::generate();

        let k1 = derive_session_key(&local, &peer.public_key_bytes()).unwrap();
        let k2 = derive_session_key(&local, &peer.public_key_bytes()).unwrap();

        assert_eq!(k1.as_bytes(), k2.as_bytes(), "same inputs must produce same key");
    }

    #[test]
    fn both_sides_agree() {
        let alice = AgreementKeyPair::generate();
        let bob = AgreementKeyPair::generate();

        let alice_key = derive_session_key(&alice, &bob.public_key_bytes()).unwrap();
        let bob_key = derive_session_key(&bob, &alice.public_key_bytes()).unwrap();

        assert_eq!(alice_key.as_bytes(), bob_key.as_bytes());
    }

    #[test]
    fn different_peers_produce_different_keys() {
        let local = AgreementKeyPair::generate();
        let peer_a = AgreementKeyPair::generate();
        let peer_b = AgreementKeyPair::generate();

        let key_a = derive_session_key(&local, &peer_a.public_key_bytes()).unwrap();
        let key_b = derive_session_key(&local, &peer_b.public_key_bytes()).unwrap();

        assert_ne!(key_a.as_bytes(), key_b.as_bytes());
    }

    #[test]
    fn invalid_peer_point_fails() {
        let local = AgreementKeyPair::generate();

        let result = derive_session_key(&local, &[0xFF; 33]);
        assert!(matches!(result, Err(CryptoError::KeyAgreementFailed { .. })));
    }

    #[test]
    fn empty_peer_bytes_fail() {
        let local = AgreementKeyPair::generate();

        let result = derive_session_key(&local, &[]);
        assert!(matches!(result, Err(CryptoError::KeyAgreementFailed { .. })));
    }

    #[test]
    fn uncompressed_peer_point_accepted() {
        use p256::elliptic_curve::sec1::ToEncodedPoint;

        let local = AgreementKeyPair::generate();
        let peer = AgreementKeyPair::generate();
        let uncompressed = peer.public_key().to_encoded_point(false);

        let from_uncompressed = derive_session_key(&local, uncompressed.as_bytes()).unwrap();
        let from_compressed = derive_session_key(&local, &peer.public_key_bytes()).unwrap();

        assert_eq!(from_uncompressed.as_bytes(), from_compressed.as_bytes());
    }

    #[test]
    fn session_key_from_bytes_round_trip() {
        let bytes = [7u8; KEY_LEN];
        let key = SessionKey::from_bytes(&bytes).unwrap();
        assert_eq!(key.as_bytes(), &bytes);
    }

    #[test]
    fn session_key_rejects_wrong_length() {
        let result = SessionKey::from_bytes(&[0u8; 16]);
        assert!(matches!(
            result,
            Err(CryptoError::InvalidKeyLength { expected: 32, actual: 16 })
        ));
    }
}
