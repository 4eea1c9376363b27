//! Drives one scanned payload through the certificate lifecycle and into the
//! ledger.

use std::sync::Arc;

use serde_json::Value;

use badged_ledger::{BadgeLedger, Insertion};
use badged_types::Clock;
use badged_verifier::{CertificateHandle, VerifierSlot};

use crate::payload::{decode_payload, QrPayload};
use crate::{RedemptionError, RedemptionOutcome};

pub struct RedemptionOrchestrator {
    slot: Arc<VerifierSlot>,
    ledger: Arc<BadgeLedger>,
    clock: Arc<dyn Clock>,
}

impl RedemptionOrchestrator {
    pub fn new(slot: Arc<VerifierSlot>, ledger: Arc<BadgeLedger>, clock: Arc<dyn Clock>) -> Self {
        Self {
            slot,
            ledger,
            clock,
        }
    }

    pub fn ledger(&self) -> &Arc<BadgeLedger> {
        &self.ledger
    }

    /// Redeem one scanned payload.
    ///
    /// The certificate handle lives until the ledger step has finished and
    /// is destroyed exactly once whichever way this returns. Failures before
    /// the ledger step never write to it.
    pub fn redeem(&self, raw: &str) -> Result<RedemptionOutcome, RedemptionError> {
        let blob = self.decode(raw)?;

        let mut handle = self.slot.acquire();
        let content = self.load(&mut handle, &blob)?;
        handle.verify()?;
        tracing::debug!(handle = handle.id(), "certificate verified");

        let payload = QrPayload::from_content(&content, raw.trim()).inspect_err(|e| {
            tracing::info!(handle = handle.id(), error = %e, "verified certificate has invalid content");
        })?;
        let serial = payload.serial.clone();

        let outcome = match self.ledger.get(&serial)? {
            Some(existing) => RedemptionOutcome::AlreadyRedeemed(existing),
            None => {
                let badge = payload.into_badge(self.clock.now());
                match self.ledger.insert_if_absent(&badge)? {
                    Insertion::Inserted => RedemptionOutcome::NewBadge(badge),
                    // Another attempt recorded this serial after the lookup.
                    Insertion::Existing(existing) => RedemptionOutcome::AlreadyRedeemed(existing),
                }
            }
        };
        handle.destroy();

        tracing::info!(%serial, new = outcome.is_new(), "voucher processed");
        Ok(outcome)
    }

    /// Verify a payload's certificate without touching the ledger.
    ///
    /// Returns `Ok(false)` for unreadable or rejected certificates; only a
    /// payload that is not base64 is an error.
    pub fn check(&self, raw: &str) -> Result<bool, RedemptionError> {
        let blob = self.decode(raw)?;
        let mut handle = self.slot.acquire();
        if self.load(&mut handle, &blob).is_err() {
            return Ok(false);
        }
        let verified = handle.verify().is_ok();
        tracing::debug!(handle = handle.id(), verified, "certificate checked");
        Ok(verified)
    }

    /// Extract a payload's certificate content without verifying it.
    ///
    /// The content must be a JSON object; the scanned text is attached under
    /// `cert`. Required voucher fields are not checked.
    pub fn inspect(&self, raw: &str) -> Result<Value, RedemptionError> {
        let blob = self.decode(raw)?;
        let mut handle = self.slot.acquire();
        let content = self.load(&mut handle, &blob)?;
        drop(handle);

        let mut value: Value = serde_json::from_str(&content)
            .map_err(|e| RedemptionError::SchemaInvalid(format!("content is not JSON: {e}")))?;
        let Some(fields) = value.as_object_mut() else {
            return Err(RedemptionError::SchemaInvalid(
                "content is not a JSON object".to_string(),
            ));
        };
        fields.insert("cert".to_string(), Value::String(raw.trim().to_string()));
        Ok(value)
    }

    fn decode(&self, raw: &str) -> Result<Vec<u8>, RedemptionError> {
        let blob = decode_payload(raw).inspect_err(|e| {
            tracing::info!(len = raw.len(), error = %e, "scanned payload rejected");
        })?;
        tracing::trace!(len = blob.len(), bytes = %hex::encode(&blob), "decoded certificate blob");
        Ok(blob)
    }

    fn load(
        &self,
        handle: &mut CertificateHandle<'_>,
        blob: &[u8],
    ) -> Result<String, RedemptionError> {
        let content = handle.deserialize(blob)?;
        if let Some(domain) = handle.domain() {
            tracing::debug!(handle = handle.id(), %domain, "certificate domain");
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use badged_ledger::LEDGER_KEY;
    use badged_nullables::{NullClock, NullStore, NullVerifier};
    use badged_types::{Serial, Timestamp, DEFAULT_PROJECT};
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    const VOUCHER: &str = r#"{"serial":"100","offer":"Coffee","holder":"alice","project":"Cafe"}"#;

    struct Fixture {
        verifier: NullVerifier,
        store: Arc<NullStore>,
        clock: Arc<NullClock>,
        orchestrator: RedemptionOrchestrator,
    }

    /// The null verifier echoes the decoded blob as content by default, so a
    /// payload is just base64 of the voucher JSON.
    fn fixture() -> Fixture {
        let verifier = NullVerifier::new();
        let store = Arc::new(NullStore::new());
        let clock = Arc::new(NullClock::new(Timestamp::new(1_700_000_000_000)));
        let orchestrator = RedemptionOrchestrator::new(
            Arc::new(VerifierSlot::new(verifier.clone())),
            Arc::new(BadgeLedger::new(store.clone())),
            clock.clone(),
        );
        Fixture {
            verifier,
            store,
            clock,
            orchestrator,
        }
    }

    fn payload(content: &str) -> String {
        STANDARD.encode(content)
    }

    #[test]
    fn first_redemption_creates_badge() {
        let f = fixture();
        let raw = payload(VOUCHER);
        let outcome = f.orchestrator.redeem(&raw).unwrap();

        let RedemptionOutcome::NewBadge(badge) = outcome else {
            panic!("expected a new badge");
        };
        assert_eq!(badge.serial.as_str(), "100");
        assert_eq!(badge.offer, "Coffee");
        assert_eq!(badge.certificate_data, raw);
        assert_eq!(badge.redeemed_at, Timestamp::new(1_700_000_000_000));
        assert_eq!(f.verifier.destroy_calls(), 1);
    }

    #[test]
    fn second_redemption_is_deduplicated() {
        let f = fixture();
        let raw = payload(VOUCHER);
        assert!(f.orchestrator.redeem(&raw).unwrap().is_new());
        f.clock.advance(60_000);

        let again = f.orchestrator.redeem(&raw).unwrap();
        let RedemptionOutcome::AlreadyRedeemed(badge) = again else {
            panic!("expected a duplicate");
        };
        // The stored badge keeps its original redemption time.
        assert_eq!(badge.redeemed_at, Timestamp::new(1_700_000_000_000));
        assert_eq!(f.orchestrator.ledger().len().unwrap(), 1);
        assert_eq!(f.store.write_count(), 1);
        assert_eq!(f.verifier.destroy_calls(), 2);
    }

    #[test]
    fn malformed_payload_never_touches_verifier() {
        let f = fixture();
        let err = f.orchestrator.redeem("%%% not base64 %%%").unwrap_err();
        assert!(matches!(err, RedemptionError::MalformedPayload(_)));
        assert_eq!(f.verifier.deserialize_calls(), 0);
        assert_eq!(f.verifier.destroy_calls(), 0);
    }

    #[test]
    fn unreadable_certificate() {
        let f = fixture();
        f.verifier.set_unreadable();
        let err = f.orchestrator.redeem(&payload(VOUCHER)).unwrap_err();
        assert!(matches!(err, RedemptionError::CertificateDeserializeError));
        assert_eq!(f.verifier.verify_calls(), 0);
        assert_eq!(f.verifier.destroy_calls(), 1);
    }

    #[test]
    fn rejected_certificate_writes_nothing() {
        let f = fixture();
        f.verifier.set_accept(false);
        let err = f.orchestrator.redeem(&payload(VOUCHER)).unwrap_err();
        assert!(matches!(err, RedemptionError::CertificateVerificationFailed));
        assert_eq!(f.store.write_count(), 0);
        assert_eq!(f.verifier.destroy_calls(), 1);
    }

    #[test]
    fn incomplete_content_is_schema_invalid() {
        let f = fixture();
        let err = f.orchestrator.redeem(&payload(r#"{"serial":"7"}"#)).unwrap_err();
        assert!(matches!(err, RedemptionError::SchemaInvalid(_)));
        assert_eq!(f.verifier.verify_calls(), 1);
        assert_eq!(f.store.write_count(), 0);
        assert!(f.store.raw(LEDGER_KEY).is_none());
        assert_eq!(f.verifier.destroy_calls(), 1);
    }

    #[test]
    fn null_project_uses_default() {
        let f = fixture();
        let raw = payload(r#"{"serial":"5","offer":"o","holder":"h","project":null}"#);
        let badge = f.orchestrator.redeem(&raw).unwrap().into_badge();
        assert_eq!(badge.project, DEFAULT_PROJECT);
    }

    #[test]
    fn store_failure_is_persist_error() {
        let f = fixture();
        f.store.fail_writes(true);
        let err = f.orchestrator.redeem(&payload(VOUCHER)).unwrap_err();
        assert!(matches!(err, RedemptionError::PersistError(_)));
        assert_eq!(f.verifier.destroy_calls(), 1);

        // A rescan after the store recovers redeems normally.
        f.store.fail_writes(false);
        assert!(f.orchestrator.redeem(&payload(VOUCHER)).unwrap().is_new());
    }

    #[test]
    fn store_read_failure_is_persist_error() {
        let f = fixture();
        f.store.fail_reads(true);
        assert!(matches!(
            f.orchestrator.redeem(&payload(VOUCHER)),
            Err(RedemptionError::PersistError(_))
        ));
        assert_eq!(f.verifier.destroy_calls(), 1);
    }

    #[test]
    fn check_reports_without_ledger_writes() {
        let f = fixture();
        assert!(f.orchestrator.check(&payload(VOUCHER)).unwrap());
        f.verifier.set_accept(false);
        assert!(!f.orchestrator.check(&payload(VOUCHER)).unwrap());
        f.verifier.set_unreadable();
        assert!(!f.orchestrator.check(&payload(VOUCHER)).unwrap());
        assert!(f.orchestrator.check("***").is_err());

        assert_eq!(f.store.write_count(), 0);
        assert_eq!(f.verifier.destroy_calls(), 3);
    }

    #[test]
    fn inspect_attaches_cert_without_verifying() {
        let f = fixture();
        f.verifier.set_accept(false);
        let raw = payload(r#"{"serial":"9","extra":true}"#);
        let value = f.orchestrator.inspect(&format!("{raw}\n")).unwrap();

        assert_eq!(value["serial"], "9");
        assert_eq!(value["extra"], true);
        assert_eq!(value["cert"], raw.as_str());
        assert_eq!(f.verifier.verify_calls(), 0);
        assert_eq!(f.verifier.destroy_calls(), 1);
    }

    #[test]
    fn inspect_rejects_non_object_content() {
        let f = fixture();
        assert!(matches!(
            f.orchestrator.inspect(&payload("[1]")),
            Err(RedemptionError::SchemaInvalid(_))
        ));
        assert_eq!(f.verifier.destroy_calls(), 1);
    }

    #[test]
    fn ledger_lookup_uses_existing_entries() {
        let f = fixture();
        let existing = QrPayload::from_content(VOUCHER, "older")
            .unwrap()
            .into_badge(Timestamp::new(1));
        f.orchestrator.ledger().save(&existing).unwrap();

        let outcome = f.orchestrator.redeem(&payload(VOUCHER)).unwrap();
        assert_eq!(outcome, RedemptionOutcome::AlreadyRedeemed(existing));
        assert!(f
            .orchestrator
            .ledger()
            .get(&Serial::new("100"))
            .unwrap()
            .is_some());
    }

    #[test]
    fn status_messages() {
        let f = fixture();
        let outcome = f.orchestrator.redeem(&payload(VOUCHER)).unwrap();
        assert_eq!(outcome.status_message(), "Voucher redeemed successfully!");
        let outcome = f.orchestrator.redeem(&payload(VOUCHER)).unwrap();
        assert_eq!(outcome.status_message(), "This voucher was already redeemed");
        let err = f.orchestrator.redeem("!!").unwrap_err();
        assert_eq!(err.status_message(), "Invalid QR code format");
    }
}
