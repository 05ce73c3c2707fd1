//! In-memory object store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use tracing::debug;

use dossier_core::error::AppError;
use dossier_core::result::AppResult;
use dossier_core::traits::object_store::{ObjectStore, StoredObject};

/// Object store holding bytes in a concurrent map.
///
/// Puts and deletes can be made to fail on demand so callers can exercise
/// their ordering and compensation paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<DashMap<String, Bytes>>,
    fail_puts: Arc<AtomicBool>,
    fail_deletes: Arc<AtomicBool>,
}

impl MemoryObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Bytes stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.objects.get(key).map(|entry| entry.value().clone())
    }

    /// Make every subsequent `put` fail.
    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `delete` fail.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn put(&self, key: &str, data: Bytes) -> AppResult<StoredObject> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(AppError::storage(format!("Object write rejected: {key}")));
        }
        let size_bytes = data.len() as u64;
        self.objects.insert(key.to_string(), data);
        debug!(key, size_bytes, "Stored object in memory");
        Ok(StoredObject {
            key: key.to_string(),
            url: self.url_for(key),
            size_bytes,
        })
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::storage(format!("Object delete rejected: {key}")));
        }
        match self.objects.remove(key) {
            Some(_) => {
                debug!(key, "Removed object from memory");
                Ok(())
            }
            None => Err(AppError::not_found(format!("Object not found: {key}"))),
        }
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.objects.contains_key(key))
    }

    fn url_for(&self, key: &str) -> String {
        format!("memory://{key}")
    }
}
