//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! TOML files plus `DOSSIER__*` environment variables. Every field has a
//! default, so an empty configuration is valid.

pub mod logging;
pub mod namespace;
pub mod storage;

use serde::{Deserialize, Serialize};

use self::logging::LoggingConfig;
use self::namespace::{NamespaceConfig, UploadConfig};
use self::storage::StorageConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Namespace engine settings.
    #[serde(default)]
    pub namespace: NamespaceConfig,
    /// Upload limits and storage key layout.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Object storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `config/default.toml`, the `config/{env}.toml`
    /// overlay, and environment variables prefixed with `DOSSIER__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config", env)
    }

    /// Same as [`AppConfig::load`] with an explicit configuration directory.
    pub fn load_from(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("DOSSIER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject values that deserialize but cannot work.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.namespace.cascade_concurrency == 0 {
            return Err(AppError::configuration(
                "namespace.cascade_concurrency must be at least 1",
            ));
        }
        if self.namespace.root_label.trim().is_empty() {
            return Err(AppError::configuration("namespace.root_label cannot be empty"));
        }
        if self.upload.key_prefix.trim_matches('/').is_empty() {
            return Err(AppError::configuration("upload.key_prefix cannot be empty"));
        }
        Ok(())
    }
}
