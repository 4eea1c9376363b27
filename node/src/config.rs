//! Session configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use badged_scanner::DEFAULT_COOLDOWN_MS;
use badged_types::PublicKey;

use crate::{LogFormat, NodeError};

/// Configuration for a badged node.
///
/// Can be loaded from a TOML file via [`SessionConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding the LMDB environment with the badge ledger.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// LMDB map size in bytes.
    #[serde(default = "default_map_size")]
    pub map_size: usize,

    /// Pause between the end of one redemption and the next admission.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,

    /// Hex-encoded Ed25519 keys whose certificates are accepted.
    #[serde(default)]
    pub trusted_keys: Vec<String>,

    /// Capacity of the scan report channel.
    #[serde(default = "default_result_capacity")]
    pub result_capacity: usize,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./badged_data")
}

fn default_map_size() -> usize {
    16 * 1024 * 1024
}

fn default_cooldown_ms() -> u64 {
    DEFAULT_COOLDOWN_MS
}

fn default_result_capacity() -> usize {
    16
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl SessionConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Reject values the session cannot run with.
    pub fn validate(&self) -> Result<(), NodeError> {
        if self.map_size == 0 {
            return Err(NodeError::Config("map_size must be positive".to_string()));
        }
        if self.result_capacity == 0 {
            return Err(NodeError::Config(
                "result_capacity must be positive".to_string(),
            ));
        }
        self.log_format()?;
        self.trusted_public_keys()?;
        Ok(())
    }

    pub fn log_format(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse().map_err(NodeError::Config)
    }

    /// Decode [`Self::trusted_keys`].
    pub fn trusted_public_keys(&self) -> Result<Vec<PublicKey>, NodeError> {
        self.trusted_keys
            .iter()
            .map(|hex| {
                PublicKey::from_hex(hex)
                    .map_err(|e| NodeError::Config(format!("trusted key '{hex}': {e}")))
            })
            .collect()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            map_size: default_map_size(),
            cooldown_ms: default_cooldown_ms(),
            trusted_keys: Vec::new(),
            result_capacity: default_result_capacity(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
