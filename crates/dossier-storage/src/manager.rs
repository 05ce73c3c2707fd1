//! Object store manager that dispatches to the configured provider.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::info;

use dossier_core::config::storage::StorageConfig;
use dossier_core::error::AppError;
use dossier_core::result::AppResult;
use dossier_core::traits::object_store::{ObjectStore, StoredObject};

use crate::providers::{LocalObjectStore, MemoryObjectStore};

/// Object store manager that wraps the configured provider.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct ObjectStoreManager {
    inner: Arc<dyn ObjectStore>,
}

impl ObjectStoreManager {
    /// Create a new manager from configuration.
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        let inner: Arc<dyn ObjectStore> = match config.provider.as_str() {
            "memory" => {
                info!("Initializing in-memory object store");
                Arc::new(MemoryObjectStore::new())
            }
            "local" => {
                info!(root = %config.local.root_path, "Initializing local object store");
                Arc::new(LocalObjectStore::new(&config.local.root_path).await?)
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown storage provider: '{other}'. Supported: memory, local"
                )));
            }
        };
        Ok(Self { inner })
    }

    /// Create a manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn ObjectStore>) -> Self {
        Self { inner: provider }
    }

    /// Get a reference to the inner provider.
    pub fn provider(&self) -> &dyn ObjectStore {
        self.inner.as_ref()
    }
}

#[async_trait]
impl ObjectStore for ObjectStoreManager {
    fn provider_type(&self) -> &str {
        self.inner.provider_type()
    }

    async fn put(&self, key: &str, data: Bytes) -> AppResult<StoredObject> {
        self.inner.put(key, data).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.inner.exists(key).await
    }

    fn url_for(&self, key: &str) -> String {
        self.inner.url_for(key)
    }
}
