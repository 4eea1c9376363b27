//! LMDB database integrity checks.
//!
//! Run on session start to detect corruption early, before the first
//! redemption reads the ledger.

use heed::types::Bytes;

use crate::environment::EXPECTED_DATABASES;
use crate::{LmdbEnvironment, LmdbError};

/// Summary of an integrity check run.
#[derive(Debug)]
pub struct IntegrityReport {
    pub databases_checked: u32,
    pub total_entries: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Open each expected database and count its entries.
///
/// Read failures are recorded in the report rather than returned as errors;
/// only failing to start a read transaction is fatal.
pub fn check_integrity(env: &LmdbEnvironment) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport {
        databases_checked: 0,
        total_entries: 0,
        errors: Vec::new(),
    };

    let rtxn = env.env().read_txn()?;

    for &db_name in EXPECTED_DATABASES {
        match env.env().open_database::<Bytes, Bytes>(&rtxn, Some(db_name)) {
            Ok(Some(db)) => {
                report.databases_checked += 1;
                match db.len(&rtxn) {
                    Ok(count) => report.total_entries += count,
                    Err(e) => report
                        .errors
                        .push(format!("failed to read database '{}': {}", db_name, e)),
                }
            }
            Ok(None) => {
                report
                    .errors
                    .push(LmdbError::MissingDatabase(db_name.to_string()).to_string());
            }
            Err(e) => {
                report
                    .errors
                    .push(format!("failed to open database '{}': {}", db_name, e));
            }
        }
    }

    if report.is_healthy() {
        tracing::debug!(
            databases = report.databases_checked,
            entries = report.total_entries,
            "LMDB integrity check passed"
        );
    } else {
        tracing::warn!(errors = ?report.errors, "LMDB integrity check found problems");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use badged_store::KvStore;

    #[test]
    fn fresh_environment_is_healthy() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).unwrap();
        let report = check_integrity(&env).unwrap();
        assert!(report.is_healthy());
        assert_eq!(report.databases_checked, 1);
        assert_eq!(report.total_entries, 0);
    }

    #[test]
    fn counts_entries() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).unwrap();
        env.kv_store().put("a", b"1").unwrap();
        env.kv_store().put("b", b"2").unwrap();
        assert_eq!(check_integrity(&env).unwrap().total_entries, 2);
    }
}
