//! The badge record: one redeemed voucher.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Serial, Timestamp};

/// Offer shown when the certificate did not name one.
pub const DEFAULT_OFFER: &str = "Unclaimed Offer";
/// Holder shown when the certificate did not name one.
pub const DEFAULT_HOLDER: &str = "Anonymous";
/// Project shown when the certificate did not name one.
pub const DEFAULT_PROJECT: &str = "Unknown";

/// A persisted record of one redeemed voucher.
///
/// The serialized field names (`certificateData`, `timestamp`) are the
/// persisted ledger format and must not change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub serial: Serial,
    #[serde(default = "default_offer")]
    pub offer: String,
    #[serde(default = "default_holder")]
    pub holder: String,
    #[serde(default = "default_project")]
    pub project: String,
    /// The original base64 certificate blob, kept for audit and re-display.
    #[serde(rename = "certificateData", default)]
    pub certificate_data: String,
    #[serde(rename = "timestamp")]
    pub redeemed_at: Timestamp,
}

fn default_offer() -> String {
    DEFAULT_OFFER.to_string()
}

fn default_holder() -> String {
    DEFAULT_HOLDER.to_string()
}

fn default_project() -> String {
    DEFAULT_PROJECT.to_string()
}

impl Badge {
    /// Build a badge, substituting the display defaults for missing metadata.
    pub fn new(
        serial: Serial,
        offer: Option<String>,
        holder: Option<String>,
        project: Option<String>,
        certificate_data: impl Into<String>,
        redeemed_at: Timestamp,
    ) -> Self {
        Self {
            serial,
            offer: offer.unwrap_or_else(default_offer),
            holder: holder.unwrap_or_else(default_holder),
            project: project.unwrap_or_else(default_project),
            certificate_data: certificate_data.into(),
            redeemed_at,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} Badge", self.offer)
    }

    pub fn display_description(&self) -> String {
        format!(
            "Offer: {}\nHolder: {}\nProject: {}",
            self.offer, self.holder, self.project
        )
    }

    /// Redemption time rendered as e.g. `March 4, 2025 09:15:02 PM` (UTC).
    pub fn formatted_date(&self) -> String {
        let millis = i64::try_from(self.redeemed_at.as_millis()).unwrap_or(i64::MAX);
        match DateTime::<Utc>::from_timestamp_millis(millis) {
            Some(dt) => dt.format("%B %-d, %Y %I:%M:%S %p").to_string(),
            None => self.redeemed_at.to_string(),
        }
    }
}
