//! Property-based tests for the Peerseal primitives
//!
//! These tests verify the fundamental invariants of the crypto layer:
//!
//! 1. **AEAD round-trip**: open(seal(m)) == m for all payloads
//! 2. **Tamper detection**: any single-bit flip fails authentication
//! 3. **Signature round-trip**: verify(sign(m)) for all messages, and
//!    verify never errors on arbitrary signature bytes
//! 4. **ECDH determinism**: both sides of an exchange derive the same key

use peerseal_crypto::{
    AgreementKeyPair, PersistedKeyPair, SessionKey, SigningKeyPair, aead, derive_session_key,
    signing,
};
use proptest::prelude::*;

fn session_key(byte: u8) -> SessionKey {
    SessionKey::from_bytes(&[byte; aead::KEY_LEN]).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_seal_open_roundtrip(
        plaintext in prop::collection::vec(any::<u8>(), 0..1000),
        key_byte in any::<u8>(),
        aad in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let key = session_key(key_byte);

        let sealed = aead::seal(&plaintext, &key, &aad).unwrap();
        let opened = aead::open(&sealed, &key, &aad).unwrap();

        prop_assert_eq!(opened, plaintext);
    }

    #[test]
    fn prop_bit_flip_in_ciphertext_fails(
        plaintext in prop::collection::vec(any::<u8>(), 1..200),
        key_byte in any::<u8>(),
        flip_bit in 0usize..8,
    ) {
        let key = session_key(key_byte);
        let mut sealed = aead::seal(&plaintext, &key, &[]).unwrap();

        let byte_index = flip_bit % sealed.ciphertext.len().max(1);
        sealed.ciphertext[byte_index] ^= 1 << flip_bit;

        prop_assert!(aead::open(&sealed, &key, &[]).is_err());
    }

    #[test]
    fn prop_bit_flip_in_tag_fails(
        plaintext in prop::collection::vec(any::<u8>(), 0..200),
        key_byte in any::<u8>(),
        byte_index in 0usize..aead::TAG_LEN,
        flip_bit in 0usize..8,
    ) {
        let key = session_key(key_byte);
        let mut sealed = aead::seal(&plaintext, &key, &[]).unwrap();

        sealed.tag[byte_index] ^= 1 << flip_bit;

        prop_assert!(aead::open(&sealed, &key, &[]).is_err());
    }
}

proptest! {
    // Signing involves a scalar multiplication per case; keep the count low
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_sign_verify_roundtrip(message in prop::collection::vec(any::<u8>(), 0..500)) {
        let pair = SigningKeyPair::generate();

        let signature = signing::sign(&pair, &message).unwrap();
        prop_assert!(signing::verify(&pair.public_key_bytes(), &message, &signature));
    }

    #[test]
    fn prop_verify_never_panics_on_garbage(
        message in prop::collection::vec(any::<u8>(), 0..100),
        garbage in prop::collection::vec(any::<u8>(), 0..128),
    ) {
        let pair = SigningKeyPair::generate();

        // Arbitrary bytes are an expected adversarial input: boolean false,
        // never a panic or an error
        let _ = signing::verify(&pair.public_key_bytes(), &message, &garbage);
        let _ = signing::verify(&garbage, &message, &garbage);
    }
}

#[test]
fn ecdh_agreement_is_symmetric_across_many_pairs() {
    for _ in 0..8 {
        let alice = AgreementKeyPair::generate();
        let bob = AgreementKeyPair::generate();

        let a = derive_session_key(&alice, &bob.public_key_bytes()).unwrap();
        let b = derive_session_key(&bob, &alice.public_key_bytes()).unwrap();

        assert_eq!(a.as_bytes(), b.as_bytes());
    }
}
