#![no_main]

use std::sync::Arc;

use badged_ledger::{BadgeLedger, LEDGER_KEY};
use badged_nullables::NullStore;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Whatever is persisted, loading degrades to an empty or partial set
    // instead of panicking, and the next save rewrites a valid set.
    let store = Arc::new(NullStore::new());
    store.seed(LEDGER_KEY, data);
    let ledger = BadgeLedger::new(store.clone());
    if let Ok(badges) = ledger.list() {
        for badge in &badges {
            let _ = badge.formatted_date();
            let _ = ledger.save(badge);
        }
    }
    if let Some(bytes) = store.raw(LEDGER_KEY) {
        if bytes != data {
            assert!(serde_json::from_slice::<serde_json::Value>(&bytes).is_ok());
        }
    }
});
