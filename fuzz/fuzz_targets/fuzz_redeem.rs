#![no_main]

use std::sync::Arc;

use badged_crypto::keypair_from_seed;
use badged_ledger::BadgeLedger;
use badged_nullables::{NullClock, NullStore};
use badged_redemption::RedemptionOrchestrator;
use badged_types::Timestamp;
use badged_verifier::{Ed25519Verifier, VerifierSlot};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Any scanned string either redeems or fails with a typed error.
    let trusted = keypair_from_seed(&[1u8; 32]).public;
    let orchestrator = RedemptionOrchestrator::new(
        Arc::new(VerifierSlot::new(Ed25519Verifier::new(vec![trusted]))),
        Arc::new(BadgeLedger::new(Arc::new(NullStore::new()))),
        Arc::new(NullClock::new(Timestamp::new(0))),
    );
    let _ = orchestrator.redeem(data);
    let _ = orchestrator.check(data);
    let _ = orchestrator.inspect(data);
});
