//! Object-storage collaborator trait.
//!
//! Holds the bytes behind file records. The namespace only needs three
//! things from it: put the bytes of a finished upload, check presence, and
//! delete an object by key, each succeeding or failing atomically per object.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Location of an object after a successful write.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoredObject {
    /// Key inside the provider. Immutable once recorded on a file.
    pub key: String,
    /// Retrieval URL; derived and may change between calls.
    pub url: String,
    /// Number of bytes written.
    pub size_bytes: u64,
}

/// Trait for object-storage backends.
///
/// Implementations live in `dossier-storage`.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "memory", "local").
    fn provider_type(&self) -> &str;

    /// Durably store `data` under `key`, replacing any previous object.
    async fn put(&self, key: &str, data: Bytes) -> AppResult<StoredObject>;

    /// Delete the object at `key`. A missing object is an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether an object exists at `key`.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Retrieval URL for `key`.
    fn url_for(&self, key: &str) -> String;
}
