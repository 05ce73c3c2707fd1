//! Namespace store capability.
//!
//! Every method is either a read or a write touching exactly one record;
//! the substrate has no transaction spanning several documents, so the
//! trait does not pretend to offer one.

use async_trait::async_trait;

use dossier_core::result::AppResult;
use dossier_core::types::{FileId, FolderId};
use dossier_entity::file::{CreateFile, File};
use dossier_entity::folder::{CreateFolder, Folder, FolderLocation};

/// Folder and file persistence with equality and prefix queries.
#[async_trait]
pub trait NamespaceStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a folder; the store assigns `id` and `created_at`.
    async fn insert_folder(&self, data: CreateFolder) -> AppResult<Folder>;

    /// Find a folder by ID.
    async fn get_folder(&self, id: FolderId) -> AppResult<Option<Folder>>;

    /// Find the folder whose `path` equals `path`.
    async fn find_folder_by_path(&self, path: &str) -> AppResult<Option<Folder>>;

    /// Folders whose `parent_path` equals `parent` (`None` lists roots).
    async fn list_folders_by_parent(&self, parent: Option<&str>) -> AppResult<Vec<Folder>>;

    /// Number of folders whose `parent_path` equals `parent`.
    async fn count_folders_by_parent(&self, parent: Option<&str>) -> AppResult<u64>;

    /// Folders strictly below `prefix` (path starts with `prefix/`).
    async fn list_folders_under(&self, prefix: &str) -> AppResult<Vec<Folder>>;

    /// Every folder record.
    async fn list_all_folders(&self) -> AppResult<Vec<Folder>>;

    /// Rewrite the location fields of one folder.
    async fn update_folder_location(
        &self,
        id: FolderId,
        location: FolderLocation,
    ) -> AppResult<Folder>;

    /// Delete a folder record. Returns `true` if it existed.
    async fn delete_folder(&self, id: FolderId) -> AppResult<bool>;

    /// Insert a file; the store assigns `id` and `uploaded_at`.
    async fn insert_file(&self, data: CreateFile) -> AppResult<File>;

    /// Find a file by ID.
    async fn get_file(&self, id: FileId) -> AppResult<Option<File>>;

    /// Files whose `container_path` equals `container`.
    async fn list_files_by_container(&self, container: &str) -> AppResult<Vec<File>>;

    /// Number of files whose `container_path` equals `container`.
    async fn count_files_by_container(&self, container: &str) -> AppResult<u64>;

    /// Files whose `container_path` is `prefix` or lies below it.
    async fn list_files_under(&self, prefix: &str) -> AppResult<Vec<File>>;

    /// Every file record, regardless of container.
    async fn list_all_files(&self) -> AppResult<Vec<File>>;

    /// Point one file at a different container.
    async fn update_file_container(&self, id: FileId, container: &str) -> AppResult<File>;

    /// Delete a file record. Returns `true` if it existed.
    async fn delete_file(&self, id: FileId) -> AppResult<bool>;
}
