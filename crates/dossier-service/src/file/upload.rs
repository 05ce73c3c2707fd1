//! Single-request uploads: bytes to object storage, then the file record.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};

use dossier_core::result::AppResult;
use dossier_core::traits::object_store::ObjectStore;
use dossier_entity::file::File;
use dossier_storage::key;

use super::service::{FileService, NewFile};
use crate::context::RequestContext;

/// Stores uploaded bytes and attaches them to the namespace.
#[derive(Debug, Clone)]
pub struct UploadService {
    /// File service used to attach the finished upload.
    files: FileService,
    /// Object store receiving the bytes.
    objects: Arc<dyn ObjectStore>,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(files: FileService, objects: Arc<dyn ObjectStore>) -> Self {
        Self { files, objects }
    }

    /// Uploads `data` as `name` into `container` (`None` for the top level).
    ///
    /// The object is written before the record, so a record never points at
    /// missing bytes. If the record insert fails the object is removed on a
    /// best-effort basis and the store error is returned.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        container: Option<&str>,
        name: &str,
        data: Bytes,
    ) -> AppResult<File> {
        self.files.check_upload(name, data.len() as u64)?;
        let container = self.files.resolve_container(container).await?;

        let storage_key = key::upload_key(
            &self.files.config().key_prefix,
            Some(&container),
            name,
            Utc::now(),
        );
        let stored = self.objects.put(&storage_key, data).await?;

        let attached = self
            .files
            .create_file(
                ctx,
                NewFile {
                    name: name.to_string(),
                    container_path: Some(container),
                    size_bytes: stored.size_bytes,
                    storage_key: stored.key.clone(),
                    url: stored.url,
                },
            )
            .await;

        match attached {
            Ok(file) => {
                info!(
                    actor = %ctx.actor,
                    file_id = %file.id,
                    key = %file.storage_key,
                    size = file.size_bytes,
                    "Upload completed"
                );
                Ok(file)
            }
            Err(err) => {
                if let Err(cleanup) = self.objects.delete(&stored.key).await {
                    warn!(
                        key = %stored.key,
                        error = %cleanup,
                        "Failed to remove object after record insert failed"
                    );
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use dossier_core::ErrorKind;
    use dossier_core::config::namespace::UploadConfig;
    use dossier_core::types::ActorId;
    use dossier_entity::folder::CreateFolder;
    use dossier_storage::providers::MemoryObjectStore;
    use dossier_store::{MemoryNamespaceStore, NamespaceStore};

    use super::*;

    async fn setup() -> (UploadService, MemoryNamespaceStore, MemoryObjectStore) {
        let store = MemoryNamespaceStore::new();
        let objects = MemoryObjectStore::new();
        store
            .insert_folder(CreateFolder::new(None, "A", 1, ActorId::new("tester")))
            .await
            .unwrap();
        let objects_arc: Arc<dyn ObjectStore> = Arc::new(objects.clone());
        let files = FileService::new(
            Arc::new(store.clone()),
            objects_arc.clone(),
            UploadConfig::default(),
        );
        (UploadService::new(files, objects_arc), store, objects)
    }

    #[tokio::test]
    async fn test_upload_stores_object_then_record() {
        let (uploads, _, objects) = setup().await;
        let ctx = RequestContext::new("tester");

        let file = uploads
            .upload(&ctx, Some("A"), "Plan (v2).pdf", Bytes::from("%PDF"))
            .await
            .unwrap();
        assert!(file.storage_key.starts_with("files/A/"));
        assert!(file.storage_key.ends_with("_Plan__v2_.pdf"));
        assert_eq!(file.media_type, "pdf");
        assert_eq!(file.size_bytes, 4);
        assert_eq!(objects.get(&file.storage_key), Some(Bytes::from("%PDF")));
    }

    #[tokio::test]
    async fn test_root_upload_uses_sentinel_segment() {
        let (uploads, _, _) = setup().await;
        let file = uploads
            .upload(&RequestContext::new("tester"), None, "a.txt", Bytes::from("a"))
            .await
            .unwrap();
        assert!(file.storage_key.starts_with("files/root/"));
        assert!(file.is_at_root());
    }

    #[tokio::test]
    async fn test_record_failure_removes_object() {
        let (uploads, store, objects) = setup().await;
        store.fail_writes_after(0);

        let err = uploads
            .upload(&RequestContext::new("tester"), Some("A"), "a.txt", Bytes::from("a"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::StoreUnavailable);
        assert!(objects.is_empty());
    }

    #[tokio::test]
    async fn test_object_failure_writes_no_record() {
        let (uploads, store, objects) = setup().await;
        objects.fail_puts(true);

        let err = uploads
            .upload(&RequestContext::new("tester"), Some("A"), "a.txt", Bytes::from("a"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Storage);
        assert!(store.list_files_by_container("A").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_container_stores_nothing() {
        let (uploads, _, objects) = setup().await;
        let ctx = RequestContext::new("tester");

        let err = uploads
            .upload(&ctx, Some("Nope"), "a.txt", Bytes::from("a"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(objects.is_empty());
    }
}
