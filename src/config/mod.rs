mod defaults;
mod types;

pub use types::*;

use crate::error::ConfigError;
use defaults::*;
use std::path::Path;
use tracing::debug;

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            provider: Provider::default(),
            providers: ProvidersConfig::default(),
            retry: RetryConfig::default(),
            history: HistoryConfig::default(),
            validation: ValidationConfig::default(),
            default_weights: default_weights(),
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load config if the file exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("Config {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history.capacity == 0 {
            return Err(ConfigError::Invalid(
                "history.capacity must be at least 1".to_string(),
            ));
        }

        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }

        if self.retry.backoff_base_ms == 0 {
            return Err(ConfigError::Invalid(
                "retry.backoff_base_ms must be at least 1".to_string(),
            ));
        }

        self.default_weights
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.provider == Provider::Gemini && self.providers.gemini.base_url.is_empty() {
            return Err(ConfigError::Invalid(
                "providers.gemini.base_url must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
