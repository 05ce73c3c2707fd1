//! Folder operations: the namespace engine proper.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use dossier_core::config::namespace::NamespaceConfig;
use dossier_core::error::AppError;
use dossier_core::path::{self, Inclusion};
use dossier_core::result::AppResult;
use dossier_core::types::{FileSort, FolderId};
use dossier_entity::file::sort_files;
use dossier_entity::folder::{
    BreadcrumbEntry, ChildListing, CreateFolder, Folder, FolderLocation, sort_folders,
};
use dossier_store::NamespaceStore;

use super::cascade::{self, CascadeReport, Relocation};
use super::reconcile::{self, IntegrityViolation, ReconcileReport};
use super::breadcrumb;
use crate::context::RequestContext;

/// Manages the folder tree over a flat namespace store.
///
/// Every operation re-reads the store; nothing about the tree is cached.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Namespace store.
    store: Arc<dyn NamespaceStore>,
    /// Engine configuration.
    config: NamespaceConfig,
}

/// Request to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolderRequest {
    /// Path of the parent folder (`None` for a root folder).
    pub parent_path: Option<String>,
    /// Folder name.
    pub name: String,
}

impl CreateFolderRequest {
    /// Request a folder `name` under `parent_path`.
    pub fn new(parent_path: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            parent_path: parent_path.map(str::to_string),
            name: name.into(),
        }
    }
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(store: Arc<dyn NamespaceStore>, config: NamespaceConfig) -> Self {
        Self { store, config }
    }

    /// Engine configuration.
    pub fn config(&self) -> &NamespaceConfig {
        &self.config
    }

    /// The underlying namespace store.
    pub fn store(&self) -> &Arc<dyn NamespaceStore> {
        &self.store
    }

    fn concurrency(&self) -> usize {
        self.config.cascade_concurrency.max(1)
    }

    /// Gets a folder by ID.
    pub async fn get_folder(&self, folder_id: FolderId) -> AppResult<Folder> {
        self.store
            .get_folder(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }

    /// Finds the folder at `path`, if any.
    pub async fn find_folder(&self, path: &str) -> AppResult<Option<Folder>> {
        self.store.find_folder_by_path(path).await
    }

    /// Creates a new folder as the last of its siblings.
    ///
    /// The order is `count(siblings) + 1`, read then written without a
    /// lock; concurrent creates under one parent may share an order value.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        req: CreateFolderRequest,
    ) -> AppResult<Folder> {
        path::validate_segment(&req.name)?;
        let parent = path::normalize_parent(req.parent_path.as_deref());
        check_reserved(parent, &req.name)?;

        if let Some(parent_path) = parent {
            if self.store.find_folder_by_path(parent_path).await?.is_none() {
                return Err(AppError::validation(format!(
                    "Parent folder '{parent_path}' does not exist"
                )));
            }
        }

        let full_path = path::join(parent, &req.name);
        if self.store.find_folder_by_path(&full_path).await?.is_some() {
            return Err(AppError::conflict(format!(
                "A folder already exists at '{full_path}'"
            )));
        }

        let siblings = self.store.count_folders_by_parent(parent).await?;
        let order = u32::try_from(siblings + 1)
            .map_err(|_| AppError::internal(format!("Too many folders under {parent:?}")))?;

        let folder = self
            .store
            .insert_folder(CreateFolder::new(parent, &req.name, order, ctx.actor.clone()))
            .await?;

        info!(
            actor = %ctx.actor,
            folder_id = %folder.id,
            path = %folder.path,
            order = folder.order,
            "Folder created"
        );

        Ok(folder)
    }

    /// Renames a folder in place and cascades the new path to its subtree.
    ///
    /// Renaming to the current name writes nothing.
    pub async fn rename_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        new_name: &str,
    ) -> AppResult<Relocation> {
        path::validate_segment(new_name)?;
        let folder = self.get_folder(folder_id).await?;
        if folder.name == new_name {
            return Ok(Relocation {
                folder,
                report: CascadeReport::default(),
            });
        }
        check_reserved(folder.parent_path.as_deref(), new_name)?;

        let target = FolderLocation::new(folder.parent_path.as_deref(), new_name);
        self.ensure_vacant(&target, folder.id).await?;

        let relocation = cascade::relocate(
            self.store.as_ref(),
            &folder,
            target,
            self.concurrency(),
        )
        .await?;

        info!(
            actor = %ctx.actor,
            folder_id = %folder.id,
            old_path = %folder.path,
            new_path = %relocation.folder.path,
            folders = relocation.report.folders_updated,
            files = relocation.report.files_updated,
            "Folder renamed"
        );

        Ok(relocation)
    }

    /// Moves a folder under `new_parent` (`None` for the top level) and
    /// cascades the new path to its subtree.
    pub async fn move_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        new_parent: Option<&str>,
    ) -> AppResult<Relocation> {
        let folder = self.get_folder(folder_id).await?;
        let new_parent = path::normalize_parent(new_parent);

        if new_parent == folder.parent_path.as_deref() {
            return Ok(Relocation {
                folder,
                report: CascadeReport::default(),
            });
        }

        if let Some(parent_path) = new_parent {
            if path::is_descendant(parent_path, &folder.path, Inclusion::Inclusive) {
                return Err(AppError::validation(format!(
                    "Cannot move '{}' into itself or its own subtree",
                    folder.path
                )));
            }
            if self.store.find_folder_by_path(parent_path).await?.is_none() {
                return Err(AppError::validation(format!(
                    "Target folder '{parent_path}' does not exist"
                )));
            }
        }
        check_reserved(new_parent, &folder.name)?;

        let target = FolderLocation::new(new_parent, &folder.name);
        self.ensure_vacant(&target, folder.id).await?;

        let relocation = cascade::relocate(
            self.store.as_ref(),
            &folder,
            target,
            self.concurrency(),
        )
        .await?;

        info!(
            actor = %ctx.actor,
            folder_id = %folder.id,
            old_path = %folder.path,
            new_path = %relocation.folder.path,
            folders = relocation.report.folders_updated,
            files = relocation.report.files_updated,
            "Folder moved"
        );

        Ok(relocation)
    }

    /// Resumes an interrupted rename/move of `folder_id` from `old_path` to
    /// `new_path`.
    ///
    /// If the folder still reads `old_path`, the relocation is rerun. If it
    /// already reads `new_path`, every folder and file still under `old_path`
    /// is rewritten, shallowest first. Anything else is a `Conflict`.
    pub async fn resume_cascade(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        old_path: &str,
        new_path: &str,
    ) -> AppResult<Relocation> {
        if old_path.is_empty() || new_path.is_empty() {
            return Err(AppError::validation("Cascade paths cannot be empty"));
        }
        let folder = self.get_folder(folder_id).await?;

        let relocation = if folder.path == old_path {
            let target = FolderLocation::from_path(new_path);
            self.ensure_vacant(&target, folder.id).await?;
            cascade::relocate(self.store.as_ref(), &folder, target, self.concurrency()).await?
        } else if folder.path == new_path {
            if let Some(occupant) = self.store.find_folder_by_path(old_path).await? {
                return Err(AppError::conflict(format!(
                    "Path '{old_path}' has been reused by folder {}",
                    occupant.id
                )));
            }
            let report =
                cascade::sweep_prefix(self.store.as_ref(), old_path, new_path, self.concurrency())
                    .await?;
            Relocation { folder, report }
        } else {
            return Err(AppError::conflict(format!(
                "Folder {folder_id} is at '{}', neither '{old_path}' nor '{new_path}'",
                folder.path
            )));
        };

        info!(
            actor = %ctx.actor,
            folder_id = %folder_id,
            old_path,
            new_path,
            folders = relocation.report.folders_updated,
            files = relocation.report.files_updated,
            "Cascade resumed"
        );

        Ok(relocation)
    }

    /// Verifies and repairs the subtree rooted at `folder_id`.
    ///
    /// `stale_prefix` names an old path whose leftover contents belong under
    /// this folder. A consistent subtree yields a report with zero writes.
    pub async fn reconcile(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        stale_prefix: Option<&str>,
    ) -> AppResult<ReconcileReport> {
        let folder = self.get_folder(folder_id).await?;
        let report =
            reconcile::reconcile(self.store.as_ref(), folder, stale_prefix, self.concurrency())
                .await?;

        if report.is_clean() {
            debug!(actor = %ctx.actor, folder_id = %folder_id, "Subtree already consistent");
        } else {
            info!(
                actor = %ctx.actor,
                folder_id = %folder_id,
                folders = report.folders_repaired,
                files = report.files_repaired,
                "Subtree reconciled"
            );
        }
        Ok(report)
    }

    /// Reports every invariant violation in the store without writing.
    pub async fn audit(&self) -> AppResult<Vec<IntegrityViolation>> {
        reconcile::audit(self.store.as_ref()).await
    }

    /// Deletes an empty folder. Never recurses.
    pub async fn delete_folder(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<()> {
        let folder = self.get_folder(folder_id).await?;

        let files = self.store.count_files_by_container(&folder.path).await?;
        let subfolders = self
            .store
            .count_folders_by_parent(Some(&folder.path))
            .await?;
        if files > 0 || subfolders > 0 {
            return Err(AppError::folder_not_empty(format!(
                "Folder '{}' still holds {files} file(s) and {subfolders} folder(s)",
                folder.path
            )));
        }

        if !self.store.delete_folder(folder_id).await? {
            return Err(AppError::not_found(format!("Folder {folder_id} not found")));
        }

        info!(actor = %ctx.actor, folder_id = %folder_id, path = %folder.path, "Folder deleted");
        Ok(())
    }

    /// Lists the direct children of `parent` (`None` for the top level).
    ///
    /// Folders come back by order, then case-insensitive name; files by
    /// `sort`.
    pub async fn list_children(
        &self,
        parent: Option<&str>,
        sort: FileSort,
    ) -> AppResult<ChildListing> {
        let parent = path::normalize_parent(parent);
        if let Some(parent_path) = parent {
            if self.store.find_folder_by_path(parent_path).await?.is_none() {
                return Err(AppError::not_found(format!(
                    "Folder '{parent_path}' not found"
                )));
            }
        }

        let (folders, files) = futures::try_join!(
            self.store.list_folders_by_parent(parent),
            self.store.list_files_by_container(path::container_key(parent)),
        )?;

        let mut listing = ChildListing { folders, files };
        sort_folders(&mut listing.folders);
        sort_files(&mut listing.files, sort);
        Ok(listing)
    }

    /// Breadcrumb trail for `folder_path`, starting at the configured root
    /// label.
    pub async fn breadcrumb(&self, folder_path: Option<&str>) -> AppResult<Vec<BreadcrumbEntry>> {
        breadcrumb::resolve(
            self.store.as_ref(),
            &self.config.root_label,
            path::normalize_parent(folder_path),
        )
        .await
    }

    /// Fails with `Conflict` when another folder already sits at the target.
    async fn ensure_vacant(&self, target: &FolderLocation, moving: FolderId) -> AppResult<()> {
        match self.store.find_folder_by_path(&target.path).await? {
            Some(occupant) if occupant.id != moving => Err(AppError::conflict(format!(
                "A folder already exists at '{}'",
                target.path
            ))),
            _ => Ok(()),
        }
    }
}

/// The root sentinel cannot be used as a top-level folder name.
fn check_reserved(parent: Option<&str>, name: &str) -> AppResult<()> {
    if parent.is_none() && name == path::ROOT_CONTAINER {
        return Err(AppError::validation(format!(
            "'{}' is reserved at the top level",
            path::ROOT_CONTAINER
        )));
    }
    Ok(())
}
