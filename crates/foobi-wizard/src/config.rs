//! Wizard configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use foobi_billing::CheckoutConfig;
use foobi_generation::GenerationConfig;
use foobi_storage::DEFAULT_PROGRESS_KEY;

use crate::error::WizardError;

/// Where saved progress is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    Memory,
    #[default]
    File,
}

impl FromStr for StorageBackend {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            other => Err(WizardError::config(format!("unknown storage backend: {other}"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WizardConfig {
    pub storage: StorageBackend,
    /// Directory for the file store
    pub storage_dir: PathBuf,
    /// Key the snapshot is stored under
    pub progress_key: String,
    /// Upper bound on a single generation or render
    pub generation_timeout: Duration,
    pub generation: GenerationConfig,
    pub checkout: CheckoutConfig,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::File,
            storage_dir: PathBuf::from("./.foobi"),
            progress_key: DEFAULT_PROGRESS_KEY.to_string(),
            generation_timeout: Duration::from_secs(120),
            generation: GenerationConfig::default(),
            checkout: CheckoutConfig::default(),
        }
    }
}

impl WizardConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, WizardError> {
        let defaults = Self::default();
        let storage = match std::env::var("FOOBI_STORAGE") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.storage,
        };

        Ok(Self {
            storage,
            storage_dir: std::env::var("FOOBI_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            progress_key: std::env::var("FOOBI_PROGRESS_KEY").unwrap_or(defaults.progress_key),
            generation_timeout: std::env::var("FOOBI_GENERATION_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.generation_timeout),
            generation: GenerationConfig::from_env(),
            checkout: CheckoutConfig::from_env(),
        })
    }

    /// In-memory storage and an instant mock studio.
    pub fn for_tests() -> Self {
        Self {
            storage: StorageBackend::Memory,
            generation: GenerationConfig::instant_mock(),
            checkout: CheckoutConfig {
                poll_interval: Duration::from_millis(5),
                timeout: Duration::from_secs(2),
                ..CheckoutConfig::default()
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_backend_parse() {
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert_eq!("FILE".parse::<StorageBackend>().unwrap(), StorageBackend::File);
        assert!("redis".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = WizardConfig::default();
        assert_eq!(config.progress_key, "foobi_progress");
        assert_eq!(config.generation_timeout, Duration::from_secs(120));
        assert_eq!(config.storage, StorageBackend::File);
    }
}
