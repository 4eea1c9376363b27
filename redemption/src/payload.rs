//! Scanned payload decoding and voucher field validation.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use serde_json::{Map, Value};

use badged_types::{Badge, Serial, Timestamp};

use crate::RedemptionError;

/// Keys that must appear in the certificate content. `cert` is not listed:
/// it is always taken from the scanned text.
pub const REQUIRED_FIELDS: [&str; 4] = ["serial", "offer", "holder", "project"];

/// Standard alphabet; padding may be present or omitted.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Base64-decode a scanned string into a certificate blob.
///
/// Whitespace anywhere in the input (QR line wrapping, trailing newlines) is
/// ignored. An empty blob is rejected.
pub fn decode_payload(raw: &str) -> Result<Vec<u8>, RedemptionError> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(RedemptionError::MalformedPayload("payload is empty".to_string()));
    }
    LENIENT
        .decode(compact.as_bytes())
        .map_err(|e| RedemptionError::MalformedPayload(e.to_string()))
}

/// Voucher fields extracted from verified certificate content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QrPayload {
    pub serial: Serial,
    pub offer: Option<String>,
    pub holder: Option<String>,
    pub project: Option<String>,
    /// The scanned text the certificate was decoded from.
    pub cert: String,
}

impl QrPayload {
    /// Parse certificate content and attach the scanned text as `cert`.
    ///
    /// Every key in [`REQUIRED_FIELDS`] must be present. A `null` metadata
    /// value is accepted and later replaced by the display default; numbers
    /// and booleans are taken in their JSON text form. The serial must be
    /// present and non-blank.
    pub fn from_content(content: &str, cert: &str) -> Result<Self, RedemptionError> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| RedemptionError::SchemaInvalid(format!("content is not JSON: {e}")))?;
        let Value::Object(fields) = value else {
            return Err(RedemptionError::SchemaInvalid(
                "content is not a JSON object".to_string(),
            ));
        };

        let missing: Vec<&str> = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|key| !fields.contains_key(*key))
            .collect();
        if !missing.is_empty() {
            return Err(RedemptionError::SchemaInvalid(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        let serial = text_field(&fields, "serial")
            .and_then(|s| Serial::parse(&s).ok())
            .ok_or_else(|| RedemptionError::SchemaInvalid("serial is blank".to_string()))?;

        Ok(Self {
            serial,
            offer: text_field(&fields, "offer"),
            holder: text_field(&fields, "holder"),
            project: text_field(&fields, "project"),
            cert: cert.to_string(),
        })
    }

    /// Build the badge to persist, stamped with `redeemed_at`.
    pub fn into_badge(self, redeemed_at: Timestamp) -> Badge {
        Badge::new(
            self.serial,
            self.offer,
            self.holder,
            self.project,
            self.cert,
            redeemed_at,
        )
    }
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use badged_types::{DEFAULT_HOLDER, DEFAULT_OFFER};

    #[test]
    fn decode_tolerates_whitespace_and_missing_padding() {
        assert_eq!(decode_payload("aGVs\nbG8=\n").unwrap(), b"hello");
        assert_eq!(decode_payload("  aGVsbG8 ").unwrap(), b"hello");
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            decode_payload("not base64!"),
            Err(RedemptionError::MalformedPayload(_))
        ));
        assert!(matches!(
            decode_payload(" \n "),
            Err(RedemptionError::MalformedPayload(_))
        ));
    }

    #[test]
    fn full_content_parses() {
        let p = QrPayload::from_content(
            r#"{"serial":"42","offer":"Coffee","holder":"alice","project":"Cafe"}"#,
            "Y2VydA==",
        )
        .unwrap();
        assert_eq!(p.serial.as_str(), "42");
        assert_eq!(p.offer.as_deref(), Some("Coffee"));
        assert_eq!(p.cert, "Y2VydA==");
    }

    #[test]
    fn missing_fields_are_listed() {
        let err = QrPayload::from_content(r#"{"serial":"7"}"#, "x").unwrap_err();
        match err {
            RedemptionError::SchemaInvalid(msg) => {
                assert!(msg.contains("offer, holder, project"), "{msg}")
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn null_metadata_takes_defaults() {
        let p = QrPayload::from_content(
            r#"{"serial":"1","offer":null,"holder":null,"project":"P"}"#,
            "x",
        )
        .unwrap();
        let badge = p.into_badge(Timestamp::new(5));
        assert_eq!(badge.offer, DEFAULT_OFFER);
        assert_eq!(badge.holder, DEFAULT_HOLDER);
        assert_eq!(badge.project, "P");
        assert_eq!(badge.redeemed_at, Timestamp::new(5));
    }

    #[test]
    fn numeric_serial_is_coerced() {
        let p = QrPayload::from_content(
            r#"{"serial":1001,"offer":"o","holder":"h","project":"p"}"#,
            "x",
        )
        .unwrap();
        assert_eq!(p.serial.as_str(), "1001");
    }

    #[test]
    fn blank_or_null_serial_is_invalid() {
        for content in [
            r#"{"serial":"  ","offer":"o","holder":"h","project":"p"}"#,
            r#"{"serial":null,"offer":"o","holder":"h","project":"p"}"#,
        ] {
            assert!(matches!(
                QrPayload::from_content(content, "x"),
                Err(RedemptionError::SchemaInvalid(_))
            ));
        }
    }

    #[test]
    fn non_object_content_is_invalid() {
        for content in ["[1,2]", "\"text\"", "{oops"] {
            assert!(matches!(
                QrPayload::from_content(content, "x"),
                Err(RedemptionError::SchemaInvalid(_))
            ));
        }
    }
}
