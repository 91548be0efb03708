//! Fuzz target for SealedEnvelope::decode
//!
//! This fuzzer tests envelope decoding with arbitrary field contents to find:
//! - Base64 decoder crashes or panics
//! - Length-check bypasses on the fixed-size nonce and tag fields
//! - Inconsistent SealedMessage values built from accepted input
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use peerseal_core::SealedEnvelope;
use peerseal_crypto::{NONCE_LEN, TAG_LEN};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    ciphertext: String,
    nonce: String,
    tag: String,
}

fuzz_target!(|input: FuzzInput| {
    let envelope = SealedEnvelope {
        ciphertext: input.ciphertext,
        nonce: input.nonce,
        tag: input.tag,
    };

    // Decoding arbitrary strings must never panic, only return Err
    if let Ok(sealed) = envelope.decode() {
        // Accepted input must satisfy the fixed-size field contracts
        assert_eq!(sealed.nonce.len(), NONCE_LEN);
        assert_eq!(sealed.tag.len(), TAG_LEN);

        // A decoded message must re-encode to an equivalent envelope
        let reencoded = SealedEnvelope::encode(&sealed);
        let roundtrip = reencoded.decode().expect("re-encoded envelope must decode");
        assert_eq!(roundtrip, sealed);
    }
});
