//! Configuration loading and validation for Deckhand.
//!
//! Loads a TOML file with serde defaults for every field, so an empty file
//! (or no file at all) yields a fully usable configuration. Validated at
//! load time; the decision loop trusts these values afterwards.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// The root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Decision loop tuning.
    #[serde(default, rename = "loop")]
    pub decision_loop: LoopConfig,

    /// Log filter directive when RUST_LOG is unset (e.g. "info",
    /// "deckhand_agent=debug").
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    "info".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            decision_loop: LoopConfig::default(),
            log_filter: default_log_filter(),
        }
    }
}

/// Tuning knobs for the decision loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopConfig {
    /// Hard cap on loop iterations per `run()`.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Base inter-iteration delay in milliseconds.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Additional delay per active goal / context key.
    #[serde(default = "default_delay_per_item_ms")]
    pub delay_per_item_ms: u64,

    /// Upper bound on the adaptive delay.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Timeout applied to every capability-provider call.
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,

    /// Pause after a failed iteration before continuing.
    #[serde(default = "default_error_backoff_ms")]
    pub error_backoff_ms: u64,
}

fn default_max_iterations() -> u32 {
    1000
}
fn default_base_delay_ms() -> u64 {
    100
}
fn default_delay_per_item_ms() -> u64 {
    50
}
fn default_max_delay_ms() -> u64 {
    1000
}
fn default_provider_timeout_secs() -> u64 {
    10
}
fn default_error_backoff_ms() -> u64 {
    250
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            base_delay_ms: default_base_delay_ms(),
            delay_per_item_ms: default_delay_per_item_ms(),
            max_delay_ms: default_max_delay_ms(),
            provider_timeout_secs: default_provider_timeout_secs(),
            error_backoff_ms: default_error_backoff_ms(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading config");
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a path if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Reject configurations the loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.decision_loop.max_iterations == 0 {
            return Err(ConfigError::Invalid(
                "loop.max_iterations must be positive".into(),
            ));
        }
        if self.decision_loop.max_delay_ms < self.decision_loop.base_delay_ms {
            return Err(ConfigError::Invalid(
                "loop.max_delay_ms must be >= loop.base_delay_ms".into(),
            ));
        }
        if self.decision_loop.provider_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "loop.provider_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.decision_loop.max_iterations, 1000);
        assert_eq!(config.decision_loop.base_delay_ms, 100);
        assert_eq!(config.decision_loop.max_delay_ms, 1000);
    }

    #[test]
    fn empty_file_yields_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "").unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.decision_loop.max_iterations, 1000);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn partial_file_overrides_some_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_filter = \"debug\"\n\n[loop]\nmax_iterations = 25").unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.decision_loop.max_iterations, 25);
        assert_eq!(config.decision_loop.base_delay_ms, 100);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn zero_iterations_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[loop]\nmax_iterations = 0").unwrap();
        assert!(matches!(
            AppConfig::load(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_or_default("/nonexistent/deckhand.toml").unwrap();
        assert_eq!(config.decision_loop.max_iterations, 1000);
    }
}
