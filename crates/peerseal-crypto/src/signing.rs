//! ECDSA signing and verification over P-256
//!
//! Signatures are produced DER-encoded (the transport vocabulary) with the
//! message hashed internally under SHA-256. Verification is a boolean
//! outcome, never an error: malformed DER, an invalid public key, and a
//! genuine mismatch are all expected adversarial inputs and all yield
//! `false`.

use p256::ecdsa::{
    Signature, VerifyingKey,
    signature::{Signer, Verifier},
};

use crate::{error::CryptoError, keypair::SigningKeyPair};

/// Sign a message with the device signing key, returning a DER-encoded
/// ECDSA signature.
///
/// # Errors
///
/// - `SigningFailed`: the underlying signature operation failed
pub fn sign(key: &SigningKeyPair, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let signature: Signature = key
        .signing_key()
        .try_sign(message)
        .map_err(|e| CryptoError::SigningFailed { reason: e.to_string() })?;

    Ok(signature.to_der().as_bytes().to_vec())
}

/// Verify a DER-encoded ECDSA signature over `message` under a peer public
/// key given as SEC1 bytes (compressed or uncompressed).
///
/// Returns `false` for malformed DER, an invalid public key, or a genuine
/// signature mismatch.
pub fn verify(public_key: &[u8], message: &[u8], signature_der: &[u8]) -> bool {
    let Ok(verifying) = VerifyingKey::from_sec1_bytes(public_key) else {
        return false;
    };
    verify_with_key(&verifying, message, signature_der)
}

/// Verify against an already-parsed verifying key.
pub fn verify_with_key(key: &VerifyingKey, message: &[u8], signature_der: &[u8]) -> bool {
    let Ok(signature) = Signature::from_der(signature_der) else {
        return false;
    };
    key.verify(message, &signature).is_ok()
}

#[cfg(test)]
mod tests {
    use crate::keypair::PersistedKeyPair;

    use super::*;

    #[test]
    fn sign_verify_round_trip() {
        let pair = SigningKeyPair::generate();
        let message = b"payload to sign";

        let signature = sign(&pair, message).unwrap();
        assert!(verify(&pair.public_key_bytes(), message, &signature));
    }

    #[test]
    fn wrong_message_fails_verification() {
        let pair = SigningKeyPair::generate();

        let signature = sign(&pair, b"original").unwrap();
        assert!(!verify(&pair.public_key_bytes(), b"modified", &signature));
    }

    #[test]
    fn wrong_key_fails_verification() {
        let pair = SigningKeyPair::generate();
        let other = SigningKeyPair::generate();

        let signature = sign(&pair, b"message").unwrap();
        assert!(!verify(&other.public_key_bytes(), b"message", &signature));
    }

    #[test]
    fn malformed_der_is_false_not_error() {
        let pair = SigningKeyPair::generate();

        assert!(!verify(&pair.public_key_bytes(), b"message", b"not a DER signature"));
        assert!(!verify(&pair.public_key_bytes(), b"message", &[]));
    }

    #[test]
    fn malformed_public_key_is_false_not_error() {
        let pair = SigningKeyPair::generate();
        let signature = sign(&pair, b"message").unwrap();

        assert!(!verify(&[0xFF; 33], b"message", &signature));
        assert!(!verify(&[], b"message", &signature));
    }

    #[test]
    fn signature_is_der_encoded() {
        let pair = SigningKeyPair::generate();
        let signature = sign(&pair, b"message").unwrap();

        // DER ECDSA signature: SEQUENCE of two INTEGERs
        assert_eq!(signature[0], 0x30);
        assert!(Signature::from_der(&signature).is_ok());
    }

    #[test]
    fn empty_message_signs_and_verifies() {
        let pair = SigningKeyPair::generate();

        let signature = sign(&pair, b"").unwrap();
        assert!(verify(&pair.public_key_bytes(), b"", &signature));
    }
}
