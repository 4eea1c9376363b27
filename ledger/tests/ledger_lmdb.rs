//! Ledger behavior over the real LMDB backend.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;

use badged_ledger::{BadgeLedger, LEDGER_KEY};
use badged_store::KvStore;
use badged_store_lmdb::LmdbEnvironment;
use badged_types::{Badge, Serial, Timestamp};

const MAP_SIZE: usize = 16 * 1024 * 1024;

fn badge(serial: &str, at: u64) -> Badge {
    Badge::new(Serial::new(serial), None, None, None, "Y2VydA==", Timestamp::new(at))
}

fn open(dir: &tempfile::TempDir) -> BadgeLedger {
    let env = LmdbEnvironment::open(dir.path(), MAP_SIZE).expect("open env");
    BadgeLedger::new(Arc::new(env.kv_store()))
}

#[test]
fn badges_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let ledger = open(&dir);
        ledger.save(&badge("1", 10)).unwrap();
        ledger.save(&badge("2", 20)).unwrap();
    }
    let ledger = open(&dir);
    let found = ledger.get(&Serial::new("1")).unwrap().unwrap();
    assert_eq!(found.redeemed_at, Timestamp::new(10));
    assert_eq!(ledger.len().unwrap(), 2);
}

#[test]
fn persisted_format_is_a_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let env = LmdbEnvironment::open(dir.path(), MAP_SIZE).unwrap();
    let store = Arc::new(env.kv_store());
    let ledger = BadgeLedger::new(store.clone());
    ledger.save(&badge("3", 30)).unwrap();

    let raw = store.get(LEDGER_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    let entry = &value.as_array().unwrap()[0];
    for key in ["serial", "offer", "holder", "project", "certificateData", "timestamp"] {
        assert!(entry.get(key).is_some(), "missing {key}");
    }
    assert_eq!(entry["timestamp"], 30);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Whatever order numeric serials are saved in, the ledger lists each once
    /// in descending numeric order.
    #[test]
    fn numeric_serials_list_descending(serials in prop::collection::vec(0u32..500, 1..20)) {
        let dir = tempfile::tempdir().unwrap();
        let ledger = open(&dir);
        for s in &serials {
            ledger.save(&badge(&s.to_string(), 1)).unwrap();
        }

        let listed: Vec<u32> = ledger
            .list()
            .unwrap()
            .iter()
            .map(|b| b.serial.as_str().parse().unwrap())
            .collect();

        let mut expected: Vec<u32> = serials.iter().copied().collect::<HashSet<_>>().into_iter().collect();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        prop_assert_eq!(listed, expected);
    }
}
