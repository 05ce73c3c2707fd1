//! In-memory namespace store using dashmap.
//!
//! Each map entry is one document; like the managed store it stands in for,
//! there is no transaction across entries. A write budget can be armed to
//! make writes fail after a number of successes, which is how partial
//! cascades are reproduced in tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tracing::debug;

use dossier_core::error::AppError;
use dossier_core::path::{self, Inclusion};
use dossier_core::result::AppResult;
use dossier_core::types::{FileId, FolderId};
use dossier_entity::file::{CreateFile, File};
use dossier_entity::folder::{CreateFolder, Folder, FolderLocation};

use crate::document::{self, Snapshot};
use crate::repository::NamespaceStore;

/// Budget value meaning "no injected failures".
const UNLIMITED: i64 = -1;

/// In-memory namespace store. Cloning shares the same collections.
#[derive(Debug, Clone)]
pub struct MemoryNamespaceStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    folders: DashMap<FolderId, Folder>,
    files: DashMap<FileId, File>,
    /// Successful writes since creation.
    writes: AtomicU64,
    /// Writes still allowed before injected failures start.
    write_budget: AtomicI64,
}

impl Default for MemoryNamespaceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryNamespaceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                folders: DashMap::new(),
                files: DashMap::new(),
                writes: AtomicU64::new(0),
                write_budget: AtomicI64::new(UNLIMITED),
            }),
        }
    }

    /// Number of successful writes performed so far.
    pub fn write_count(&self) -> u64 {
        self.inner.writes.load(Ordering::SeqCst)
    }

    /// Let `successes` more writes through, then fail every write with
    /// `StoreUnavailable` until [`MemoryNamespaceStore::clear_faults`].
    pub fn fail_writes_after(&self, successes: u64) {
        self.inner
            .write_budget
            .store(successes as i64, Ordering::SeqCst);
    }

    /// Stop injecting write failures.
    pub fn clear_faults(&self) {
        self.inner.write_budget.store(UNLIMITED, Ordering::SeqCst);
    }

    /// Load a snapshot. Every document is decoded before anything is
    /// inserted, so a malformed snapshot leaves the store untouched.
    pub fn import_snapshot(&self, snapshot: Snapshot) -> AppResult<usize> {
        let folders = snapshot
            .folders
            .into_iter()
            .map(|(id, body)| document::decode_folder(&id, body))
            .collect::<AppResult<Vec<_>>>()?;
        let files = snapshot
            .files
            .into_iter()
            .map(|(id, body)| document::decode_file(&id, body))
            .collect::<AppResult<Vec<_>>>()?;

        let count = folders.len() + files.len();
        for folder in folders {
            self.inner.folders.insert(folder.id, folder);
        }
        for file in files {
            self.inner.files.insert(file.id, file);
        }
        debug!(count, "Imported namespace snapshot");
        Ok(count)
    }

    /// Dump both collections.
    pub fn export_snapshot(&self) -> AppResult<Snapshot> {
        let mut snapshot = Snapshot::default();
        for entry in self.inner.folders.iter() {
            let (id, body) = document::encode_folder(entry.value())?;
            snapshot.folders.insert(id, body);
        }
        for entry in self.inner.files.iter() {
            let (id, body) = document::encode_file(entry.value())?;
            snapshot.files.insert(id, body);
        }
        Ok(snapshot)
    }

    /// Consume one unit of write budget, failing when it is exhausted.
    fn admit_write(&self) -> AppResult<()> {
        let budget = &self.inner.write_budget;
        let mut current = budget.load(Ordering::SeqCst);
        loop {
            if current == UNLIMITED {
                return Ok(());
            }
            if current == 0 {
                return Err(AppError::store_unavailable("Document store rejected the write"));
            }
            match budget.compare_exchange(current, current - 1, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return Ok(()),
                Err(actual) => current = actual,
            }
        }
    }

    fn record_write(&self) {
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
    }

    fn folders_where(&self, predicate: impl Fn(&Folder) -> bool) -> Vec<Folder> {
        self.inner
            .folders
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn files_where(&self, predicate: impl Fn(&File) -> bool) -> Vec<File> {
        self.inner
            .files
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }
}

#[async_trait]
impl NamespaceStore for MemoryNamespaceStore {
    async fn insert_folder(&self, data: CreateFolder) -> AppResult<Folder> {
        self.admit_write()?;
        let folder = Folder {
            id: FolderId::new(),
            name: data.name,
            path: data.path,
            depth: data.depth,
            parent_path: data.parent_path,
            order: data.order,
            created_at: Utc::now(),
            created_by: data.created_by,
        };
        self.inner.folders.insert(folder.id, folder.clone());
        self.record_write();
        Ok(folder)
    }

    async fn get_folder(&self, id: FolderId) -> AppResult<Option<Folder>> {
        Ok(self.inner.folders.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_folder_by_path(&self, path: &str) -> AppResult<Option<Folder>> {
        Ok(self
            .inner
            .folders
            .iter()
            .find(|entry| entry.value().path == path)
            .map(|entry| entry.value().clone()))
    }

    async fn list_folders_by_parent(&self, parent: Option<&str>) -> AppResult<Vec<Folder>> {
        Ok(self.folders_where(|f| f.parent_path.as_deref() == parent))
    }

    async fn count_folders_by_parent(&self, parent: Option<&str>) -> AppResult<u64> {
        Ok(self
            .inner
            .folders
            .iter()
            .filter(|entry| entry.value().parent_path.as_deref() == parent)
            .count() as u64)
    }

    async fn list_folders_under(&self, prefix: &str) -> AppResult<Vec<Folder>> {
        Ok(self.folders_where(|f| path::is_descendant(&f.path, prefix, Inclusion::Exclusive)))
    }

    async fn list_all_folders(&self) -> AppResult<Vec<Folder>> {
        Ok(self.folders_where(|_| true))
    }

    async fn update_folder_location(
        &self,
        id: FolderId,
        location: FolderLocation,
    ) -> AppResult<Folder> {
        self.admit_write()?;
        let mut entry = self
            .inner
            .folders
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        let folder = entry.value_mut();
        folder.name = location.name;
        folder.path = location.path;
        folder.parent_path = location.parent_path;
        folder.depth = location.depth;
        let updated = folder.clone();
        drop(entry);
        self.record_write();
        Ok(updated)
    }

    async fn delete_folder(&self, id: FolderId) -> AppResult<bool> {
        self.admit_write()?;
        let removed = self.inner.folders.remove(&id).is_some();
        self.record_write();
        Ok(removed)
    }

    async fn insert_file(&self, data: CreateFile) -> AppResult<File> {
        self.admit_write()?;
        let file = File {
            id: FileId::new(),
            name: data.name,
            media_type: data.media_type,
            size_bytes: data.size_bytes,
            container_path: data.container_path,
            storage_key: data.storage_key,
            url: data.url,
            uploaded_at: Utc::now(),
            uploaded_by: data.uploaded_by,
        };
        self.inner.files.insert(file.id, file.clone());
        self.record_write();
        Ok(file)
    }

    async fn get_file(&self, id: FileId) -> AppResult<Option<File>> {
        Ok(self.inner.files.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list_files_by_container(&self, container: &str) -> AppResult<Vec<File>> {
        Ok(self.files_where(|f| f.container_path == container))
    }

    async fn count_files_by_container(&self, container: &str) -> AppResult<u64> {
        Ok(self
            .inner
            .files
            .iter()
            .filter(|entry| entry.value().container_path == container)
            .count() as u64)
    }

    async fn list_files_under(&self, prefix: &str) -> AppResult<Vec<File>> {
        Ok(self.files_where(|f| {
            path::is_descendant(&f.container_path, prefix, Inclusion::Inclusive)
        }))
    }

    async fn list_all_files(&self) -> AppResult<Vec<File>> {
        Ok(self.files_where(|_| true))
    }

    async fn update_file_container(&self, id: FileId, container: &str) -> AppResult<File> {
        self.admit_write()?;
        let mut entry = self
            .inner
            .files
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;
        entry.value_mut().container_path = container.to_string();
        let updated = entry.value().clone();
        drop(entry);
        self.record_write();
        Ok(updated)
    }

    async fn delete_file(&self, id: FileId) -> AppResult<bool> {
        self.admit_write()?;
        let removed = self.inner.files.remove(&id).is_some();
        self.record_write();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_core::ErrorKind;
    use dossier_core::types::ActorId;

    fn actor() -> ActorId {
        ActorId::new("tester")
    }

    async fn folder(store: &MemoryNamespaceStore, parent: Option<&str>, name: &str) -> Folder {
        store
            .insert_folder(CreateFolder::new(parent, name, 1, actor()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_parent_and_prefix_queries() {
        let store = MemoryNamespaceStore::new();
        folder(&store, None, "A").await;
        folder(&store, Some("A"), "B").await;
        folder(&store, Some("A/B"), "C").await;
        folder(&store, None, "AB").await;

        assert_eq!(store.list_folders_by_parent(None).await.unwrap().len(), 2);
        assert_eq!(store.count_folders_by_parent(Some("A")).await.unwrap(), 1);

        let mut under: Vec<_> = store
            .list_folders_under("A")
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.path)
            .collect();
        under.sort();
        assert_eq!(under, vec!["A/B", "A/B/C"]);
    }

    #[tokio::test]
    async fn test_write_budget_fails_after_successes() {
        let store = MemoryNamespaceStore::new();
        store.fail_writes_after(1);

        folder(&store, None, "A").await;
        let err = store
            .insert_folder(CreateFolder::new(None, "B", 2, actor()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::StoreUnavailable);
        assert_eq!(store.write_count(), 1);

        store.clear_faults();
        folder(&store, None, "B").await;
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_folder_is_not_found() {
        let store = MemoryNamespaceStore::new();
        let err = store
            .update_folder_location(FolderId::new(), FolderLocation::from_path("X"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_snapshot_export_then_import() {
        let source = MemoryNamespaceStore::new();
        folder(&source, None, "A").await;
        folder(&source, Some("A"), "B").await;
        let snapshot = source.export_snapshot().unwrap();

        let target = MemoryNamespaceStore::new();
        assert_eq!(target.import_snapshot(snapshot).unwrap(), 2);
        assert!(target.find_folder_by_path("A/B").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_malformed_snapshot_imports_nothing() {
        let source = MemoryNamespaceStore::new();
        folder(&source, None, "A").await;
        let mut snapshot = source.export_snapshot().unwrap();
        snapshot
            .folders
            .insert("broken".to_string(), serde_json::json!({ "nom": "X" }));

        let target = MemoryNamespaceStore::new();
        assert!(target.import_snapshot(snapshot).is_err());
        assert!(target.list_all_folders().await.unwrap().is_empty());
    }
}
