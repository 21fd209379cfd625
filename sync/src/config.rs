//! Session configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

/// Static configuration for a voting session.
///
/// Can be loaded from a TOML file via [`SyncConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncConfig {
    /// JSON-RPC endpoint of the ledger node.
    #[serde(default = "default_ledger_endpoint")]
    pub ledger_endpoint: String,

    /// Address of the candidate registry contract.
    #[serde(default = "default_registry_address")]
    pub registry_address: String,

    /// JSON-RPC endpoint of the wallet provider. Unset means no wallet.
    #[serde(default)]
    pub wallet_provider: Option<String>,

    /// Interval between transaction receipt polls.
    #[serde(default = "default_receipt_poll_interval_ms")]
    pub receipt_poll_interval_ms: u64,

    /// Upper bound on waiting for a vote confirmation. Unset waits forever.
    #[serde(default)]
    pub confirmation_timeout_secs: Option<u64>,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_ledger_endpoint() -> String {
    "http://127.0.0.1:8545".to_string()
}

fn default_registry_address() -> String {
    "0x260471fcaB62b943247BA80934FBAbee916Ae4C8".to_string()
}

fn default_receipt_poll_interval_ms() -> u64 {
    1000
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl SyncConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }

    pub fn confirmation_timeout(&self) -> Option<Duration> {
        self.confirmation_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            ledger_endpoint: default_ledger_endpoint(),
            registry_address: default_registry_address(),
            wallet_provider: None,
            receipt_poll_interval_ms: default_receipt_poll_interval_ms(),
            confirmation_timeout_secs: None,
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = SyncConfig {
            wallet_provider: Some("http://127.0.0.1:1248".into()),
            confirmation_timeout_secs: Some(120),
            ..SyncConfig::default()
        };
        let toml_str = config.to_toml_string().expect("serializable");
        let parsed = SyncConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.registry_address, config.registry_address);
        assert_eq!(parsed.wallet_provider, config.wallet_provider);
        assert_eq!(parsed.confirmation_timeout(), Some(Duration::from_secs(120)));
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = SyncConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.ledger_endpoint, "http://127.0.0.1:8545");
        assert_eq!(
            config.registry_address,
            "0x260471fcaB62b943247BA80934FBAbee916Ae4C8"
        );
        assert!(config.wallet_provider.is_none());
        assert!(config.confirmation_timeout().is_none());
        assert_eq!(config.receipt_poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            ledger_endpoint = "https://sepolia.example.org"
            wallet_provider = "http://127.0.0.1:1248"
            receipt_poll_interval_ms = 250
        "#;
        let config = SyncConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.ledger_endpoint, "https://sepolia.example.org");
        assert_eq!(config.wallet_provider.as_deref(), Some("http://127.0.0.1:1248"));
        assert_eq!(config.receipt_poll_interval(), Duration::from_millis(250));
        assert_eq!(config.log_format, "human"); // default
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "confirmation_timeout_secs = 30").unwrap();
        let config = SyncConfig::from_toml_file(file.path()).expect("should load");
        assert_eq!(config.confirmation_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn missing_file_returns_io_error() {
        let result = SyncConfig::from_toml_file("/nonexistent/ballot.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn malformed_toml_returns_parse_error() {
        let result = SyncConfig::from_toml_str("receipt_poll_interval_ms = \"soon\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
