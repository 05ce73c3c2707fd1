//! File attach, lookup, move, and delete.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use dossier_core::config::namespace::UploadConfig;
use dossier_core::error::{AppError, ErrorKind};
use dossier_core::path::{self, ROOT_CONTAINER};
use dossier_core::result::AppResult;
use dossier_core::traits::object_store::ObjectStore;
use dossier_core::types::FileId;
use dossier_entity::file::{CreateFile, File, media_type_for};
use dossier_store::NamespaceStore;

use crate::context::RequestContext;

/// Handles file records and their backing objects.
#[derive(Debug, Clone)]
pub struct FileService {
    /// Namespace store.
    store: Arc<dyn NamespaceStore>,
    /// Object store holding file bytes.
    objects: Arc<dyn ObjectStore>,
    /// Upload limits.
    config: UploadConfig,
}

/// A finished upload to attach to the namespace.
///
/// Produced by the upload collaborator once the bytes are durably stored;
/// the object at `storage_key` is not re-checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFile {
    /// File name, including extension.
    pub name: String,
    /// Folder path to attach to (`None` or the root sentinel for the top level).
    pub container_path: Option<String>,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Object-storage key.
    pub storage_key: String,
    /// Retrieval URL.
    pub url: String,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        store: Arc<dyn NamespaceStore>,
        objects: Arc<dyn ObjectStore>,
        config: UploadConfig,
    ) -> Self {
        Self {
            store,
            objects,
            config,
        }
    }

    /// Upload limits.
    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Gets a file by ID.
    pub async fn get_file(&self, file_id: FileId) -> AppResult<File> {
        self.store
            .get_file(file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
    }

    /// Records a finished upload in the namespace.
    pub async fn create_file(&self, ctx: &RequestContext, req: NewFile) -> AppResult<File> {
        self.check_upload(&req.name, req.size_bytes)?;
        let container = self.resolve_container(req.container_path.as_deref()).await?;

        let file = self
            .store
            .insert_file(CreateFile {
                media_type: media_type_for(&req.name),
                name: req.name,
                size_bytes: req.size_bytes,
                container_path: container,
                storage_key: req.storage_key,
                url: req.url,
                uploaded_by: ctx.actor.clone(),
            })
            .await?;

        info!(
            actor = %ctx.actor,
            file_id = %file.id,
            name = %file.name,
            container = %file.container_path,
            size = file.size_bytes,
            "File attached"
        );

        Ok(file)
    }

    /// Moves a file to another container. Its storage key does not change.
    pub async fn move_file(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        target: Option<&str>,
    ) -> AppResult<File> {
        let file = self.get_file(file_id).await?;
        let container = self.resolve_container(target).await?;
        if file.container_path == container {
            return Ok(file);
        }

        let moved = self.store.update_file_container(file_id, &container).await?;

        info!(
            actor = %ctx.actor,
            file_id = %file_id,
            from = %file.container_path,
            to = %moved.container_path,
            "File moved"
        );

        Ok(moved)
    }

    /// Deletes a file: the stored object first, then the record.
    ///
    /// If the object cannot be deleted (including when it is already gone)
    /// the record is kept and a `Storage` error is returned. Comment threads
    /// keyed by the file are left alone.
    pub async fn delete_file(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<()> {
        let file = self.get_file(file_id).await?;

        self.objects
            .delete(&file.storage_key)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to delete object '{}'", file.storage_key),
                    e,
                )
            })?;

        if !self.store.delete_file(file_id).await? {
            return Err(AppError::not_found(format!("File {file_id} not found")));
        }

        info!(actor = %ctx.actor, file_id = %file_id, name = %file.name, "File deleted");
        Ok(())
    }

    /// Validates a file name and size against the upload limits.
    pub(crate) fn check_upload(&self, name: &str, size_bytes: u64) -> AppResult<()> {
        path::validate_segment(name)?;
        if size_bytes > self.config.max_file_size_bytes {
            return Err(AppError::validation(format!(
                "File '{name}' exceeds the maximum size of {} bytes",
                self.config.max_file_size_bytes
            )));
        }
        Ok(())
    }

    /// Map a requested container to the stored `container_path`, checking
    /// that the folder exists.
    pub(crate) async fn resolve_container(&self, container: Option<&str>) -> AppResult<String> {
        match path::normalize_parent(container) {
            None => Ok(ROOT_CONTAINER.to_string()),
            Some(ROOT_CONTAINER) => Ok(ROOT_CONTAINER.to_string()),
            Some(folder_path) => {
                if self.store.find_folder_by_path(folder_path).await?.is_none() {
                    return Err(AppError::validation(format!(
                        "Container folder '{folder_path}' does not exist"
                    )));
                }
                Ok(folder_path.to_string())
            }
        }
    }
}
