#![no_main]

use badged_crypto::CertificateEnvelope;
use badged_types::PublicKey;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding and verifying arbitrary bytes must never panic.
    if let Ok(envelope) = CertificateEnvelope::from_bytes(data) {
        let _ = envelope.domain();
        let _ = envelope.request_text();
        let _ = envelope.verify(&[envelope.signer, PublicKey([0u8; 32])]);
    }
});
