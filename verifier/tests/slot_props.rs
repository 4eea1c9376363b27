//! Property tests for the verifier slot backed by the Ed25519 verifier.

use proptest::prelude::*;

use badged_crypto::{keypair_from_seed, CertificateEnvelope};
use badged_verifier::{Ed25519Verifier, HandleState, VerifierSlot};

fn slot() -> VerifierSlot {
    VerifierSlot::new(Ed25519Verifier::new(vec![keypair_from_seed(&[4u8; 32]).public]))
}

proptest! {
    /// Arbitrary bytes never panic the verifier and never leave the slot held.
    #[test]
    fn arbitrary_blobs_release_the_slot(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let slot = slot();
        {
            let mut handle = slot.acquire();
            if handle.deserialize(&bytes).is_ok() {
                let _ = handle.verify();
            }
        }
        prop_assert!(slot.try_acquire().is_some());
    }

    /// Any request signed by the trusted issuer verifies through a handle.
    #[test]
    fn signed_requests_verify(request in "[ -~]{1,200}") {
        let kp = keypair_from_seed(&[4u8; 32]);
        let bytes = CertificateEnvelope::issue("test", request.as_bytes(), &kp)
            .to_bytes()
            .unwrap();
        let slot = slot();
        let mut handle = slot.acquire();
        let content = handle.deserialize(&bytes).unwrap();
        prop_assert_eq!(&content, &request);
        prop_assert!(handle.verify().is_ok());
        prop_assert_eq!(handle.state(), HandleState::Verified);
        let domain = handle.domain();
        prop_assert_eq!(domain.as_deref(), Some("test"));
    }

    /// Flipping any byte of a signed envelope never yields a verified handle
    /// for different content.
    #[test]
    fn tampering_is_detected(index in 0usize..64, flip in 1u8..=255) {
        let kp = keypair_from_seed(&[4u8; 32]);
        let request = br#"{"serial":"77","offer":"Tea","holder":"bob","project":"Cafe"}"#;
        let mut bytes = CertificateEnvelope::issue("test", request, &kp).to_bytes().unwrap();
        let i = bytes.len() - 1 - (index % bytes.len());
        bytes[i] ^= flip;

        let slot = slot();
        let mut handle = slot.acquire();
        if let Ok(content) = handle.deserialize(&bytes) {
            if handle.verify().is_ok() {
                prop_assert_eq!(content.as_bytes(), &request[..]);
            }
        }
    }
}
