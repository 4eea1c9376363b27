//! The badge ledger over an injected key/value store.

use std::sync::{Arc, Mutex, PoisonError};

use badged_store::KvStore;
use badged_types::{Badge, Serial};

use crate::ordering::sort_descending;
use crate::LedgerError;

/// Store key holding the serialized badge set.
pub const LEDGER_KEY: &str = "user_badges";

/// Result of [`BadgeLedger::insert_if_absent`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Insertion {
    /// The badge was new and has been persisted.
    Inserted,
    /// A badge with the same serial already existed; nothing was written.
    Existing(Badge),
}

/// Persistent, ordered, deduplicated store of redeemed badges.
///
/// Reads go straight to the store. Mutations hold `write_lock` across the
/// whole load-modify-store sequence so concurrent saves cannot lose each
/// other's updates.
pub struct BadgeLedger {
    store: Arc<dyn KvStore>,
    key: String,
    write_lock: Mutex<()>,
}

impl BadgeLedger {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self::with_key(store, LEDGER_KEY)
    }

    /// Use a non-default store key (e.g. one ledger per profile).
    pub fn with_key(store: Arc<dyn KvStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Look up a badge by serial.
    pub fn get(&self, serial: &Serial) -> Result<Option<Badge>, LedgerError> {
        Ok(self.load()?.into_iter().find(|b| &b.serial == serial))
    }

    /// All badges, in descending serial order.
    pub fn list(&self) -> Result<Vec<Badge>, LedgerError> {
        self.load()
    }

    pub fn len(&self) -> Result<usize, LedgerError> {
        Ok(self.load()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, LedgerError> {
        Ok(self.len()? == 0)
    }

    /// Insert `badge`, or replace the badge with the same serial in place.
    ///
    /// Re-saving identical content leaves the set unchanged.
    pub fn save(&self, badge: &Badge) -> Result<(), LedgerError> {
        let _span = tracing::debug_span!("ledger_save", serial = %badge.serial).entered();
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut badges = self.load()?;
        match badges.iter_mut().find(|b| b.serial == badge.serial) {
            Some(existing) => {
                tracing::debug!("replacing existing badge");
                *existing = badge.clone();
            }
            None => badges.push(badge.clone()),
        }
        self.store_all(badges)
    }

    /// Persist `badge` only if its serial is not in the ledger yet.
    ///
    /// The lookup and the write happen under the same lock, so two
    /// redemptions of one serial can never both insert.
    pub fn insert_if_absent(&self, badge: &Badge) -> Result<Insertion, LedgerError> {
        let _span =
            tracing::debug_span!("ledger_insert", serial = %badge.serial).entered();
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut badges = self.load()?;
        if let Some(existing) = badges.iter().find(|b| b.serial == badge.serial) {
            return Ok(Insertion::Existing(existing.clone()));
        }
        badges.push(badge.clone());
        self.store_all(badges)?;
        Ok(Insertion::Inserted)
    }

    /// Read the badge set. Undecodable data is treated as an empty set.
    fn load(&self) -> Result<Vec<Badge>, LedgerError> {
        let Some(bytes) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_slice::<Vec<Badge>>(&bytes) {
            Ok(badges) => Ok(badges),
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    error = %e,
                    len = bytes.len(),
                    "persisted badge set is malformed; treating it as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    fn store_all(&self, mut badges: Vec<Badge>) -> Result<(), LedgerError> {
        let order = sort_descending(&mut badges);
        let encoded =
            serde_json::to_vec(&badges).map_err(|e| LedgerError::Encode(e.to_string()))?;
        self.store.put(&self.key, &encoded)?;
        tracing::debug!(count = badges.len(), ?order, "badge set persisted");
        Ok(())
    }
}
