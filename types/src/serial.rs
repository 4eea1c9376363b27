//! Voucher serial numbers, the ledger's dedup key.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// The unique identifier of a voucher.
///
/// Serials are free-form strings. When a serial parses as an integer it is
/// also comparable numerically; see [`Serial::as_number`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Serial(String);

impl Serial {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse a serial taken from untrusted input. Blank serials are rejected.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TypesError::InvalidSerial("serial is blank".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric value of this serial, if it is an integer.
    pub fn as_number(&self) -> Option<i128> {
        self.0.parse().ok()
    }
}

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Serial {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Serial {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
