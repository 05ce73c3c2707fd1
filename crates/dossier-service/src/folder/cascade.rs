//! Rename/move cascade.
//!
//! A relocation rewrites the folder's own record, re-points its direct files,
//! then recurses into each direct subfolder. A folder's own write is
//! acknowledged before its children are queried, so a reader can see a
//! parent with the new prefix above stale children but never the reverse.
//! Siblings at one level are written concurrently, bounded by the configured
//! cascade concurrency.
//!
//! Nothing here is atomic. A failed write stops the walk and surfaces as
//! `PartialCascadeFailure` carrying a [`CascadeCheckpoint`].

use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::BoxFuture;
use futures::{FutureExt, TryStreamExt, stream};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use dossier_core::error::{AppError, CascadeCheckpoint, ErrorKind};
use dossier_core::path;
use dossier_core::result::AppResult;
use dossier_entity::folder::{Folder, FolderLocation};
use dossier_store::NamespaceStore;

/// Writes performed by a cascade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeReport {
    /// Folder records rewritten, including the cascade root.
    pub folders_updated: u64,
    /// File records re-pointed.
    pub files_updated: u64,
}

impl CascadeReport {
    /// Total number of store writes.
    pub fn total_writes(&self) -> u64 {
        self.folders_updated + self.files_updated
    }

    /// Whether the cascade wrote nothing.
    pub fn is_empty(&self) -> bool {
        self.total_writes() == 0
    }
}

/// Result of a rename, move, or resumed cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relocation {
    /// The cascade root as it now reads.
    pub folder: Folder,
    /// What the cascade wrote.
    pub report: CascadeReport,
}

/// Shared state of one cascade invocation.
struct Cascade<'a> {
    store: &'a dyn NamespaceStore,
    root_old: &'a str,
    root_new: &'a str,
    concurrency: usize,
    folders: AtomicU64,
    files: AtomicU64,
}

impl<'a> Cascade<'a> {
    fn new(
        store: &'a dyn NamespaceStore,
        root_old: &'a str,
        root_new: &'a str,
        concurrency: usize,
    ) -> Self {
        Self {
            store,
            root_old,
            root_new,
            concurrency: concurrency.max(1),
            folders: AtomicU64::new(0),
            files: AtomicU64::new(0),
        }
    }

    fn report(&self) -> CascadeReport {
        CascadeReport {
            folders_updated: self.folders.load(Ordering::SeqCst),
            files_updated: self.files.load(Ordering::SeqCst),
        }
    }

    /// Wrap a write failure at `stopped_at` into a partial-cascade error.
    /// Errors already carrying a checkpoint (from a deeper level) pass through.
    fn stopped(&self, stopped_at: &str, err: AppError) -> AppError {
        if err.kind == ErrorKind::PartialCascadeFailure {
            return err;
        }
        AppError::partial_cascade(
            CascadeCheckpoint {
                old_path: self.root_old.to_string(),
                new_path: self.root_new.to_string(),
                stopped_at: stopped_at.to_string(),
            },
            err,
        )
    }

    /// Re-point every file directly inside `old` to `new`.
    async fn repoint_files(&self, old: &str, new: &str) -> AppResult<()> {
        let files = self.store.list_files_by_container(old).await?;
        stream::iter(files.into_iter().map(Ok::<_, AppError>))
            .try_for_each_concurrent(self.concurrency, |file| async move {
                self.store.update_file_container(file.id, new).await?;
                self.files.fetch_add(1, Ordering::SeqCst);
                Ok::<(), AppError>(())
            })
            .await
    }

    /// Rewrite the contents of a folder that just moved from `old` to `new`.
    fn descend(&self, old: String, new: String) -> BoxFuture<'_, AppResult<()>> {
        async move {
            let (old, new) = (old.as_str(), new.as_str());
            self.repoint_files(old, new)
                .await
                .map_err(|e| self.stopped(new, e))?;

            let children = self
                .store
                .list_folders_by_parent(Some(old))
                .await
                .map_err(|e| self.stopped(new, e))?;
            let fan_out = children.len();
            debug!(old, new, children = fan_out, "Cascading into subfolders");

            stream::iter(children.into_iter().map(Ok::<_, AppError>))
                .try_for_each_concurrent(self.concurrency, |child| async move {
                    // Same as rewriting the child's prefix when it is consistent,
                    // and heals it when it is not.
                    let location = FolderLocation::new(Some(new), &child.name);
                    let child_new = location.path.clone();
                    self.store
                        .update_folder_location(child.id, location)
                        .await
                        .map_err(|e| self.stopped(new, e))?;
                    self.folders.fetch_add(1, Ordering::SeqCst);
                    self.descend(child.path, child_new).await
                })
                .await
                // One failing sibling drops the others, started or not, so
                // the stale records may sit anywhere below this folder.
                .map_err(|e| if fan_out > 1 { e.widen_checkpoint(new) } else { e })
        }
        .boxed()
    }

    /// Rewrite every record still under `root_old`, shallowest first.
    async fn sweep(&self) -> AppResult<()> {
        let (old, new) = (self.root_old, self.root_new);

        let mut stale = self
            .store
            .list_folders_under(old)
            .await
            .map_err(|e| self.stopped(new, e))?;
        stale.sort_by_key(|folder| folder.depth);

        for level in stale.chunk_by(|a, b| a.depth == b.depth) {
            stream::iter(level.iter().map(Ok::<_, AppError>))
                .try_for_each_concurrent(self.concurrency, |folder| async move {
                    let Some(rewritten) = path::rewrite_prefix(&folder.path, old, new) else {
                        return Ok::<(), AppError>(());
                    };
                    let location = FolderLocation::new(path::parent_of(&rewritten), &folder.name);
                    self.store
                        .update_folder_location(folder.id, location)
                        .await
                        .map_err(|e| self.stopped(new, e))?;
                    self.folders.fetch_add(1, Ordering::SeqCst);
                    Ok::<(), AppError>(())
                })
                .await?;
            debug!(old, new, depth = level[0].depth, count = level.len(), "Swept stale level");
        }

        let files = self
            .store
            .list_files_under(old)
            .await
            .map_err(|e| self.stopped(new, e))?;
        stream::iter(files.into_iter().map(Ok::<_, AppError>))
            .try_for_each_concurrent(self.concurrency, |file| async move {
                let Some(container) = path::rewrite_prefix(&file.container_path, old, new) else {
                    return Ok::<(), AppError>(());
                };
                self.store
                    .update_file_container(file.id, &container)
                    .await
                    .map_err(|e| self.stopped(new, e))?;
                self.files.fetch_add(1, Ordering::SeqCst);
                Ok::<(), AppError>(())
            })
            .await
    }
}

/// Move `folder` to `target` and cascade the new prefix to its subtree.
///
/// A failure on the root's own write is returned unchanged: nothing has been
/// written yet. Any later failure is a `PartialCascadeFailure`.
pub(crate) async fn relocate(
    store: &dyn NamespaceStore,
    folder: &Folder,
    target: FolderLocation,
    concurrency: usize,
) -> AppResult<Relocation> {
    let old_path = folder.path.clone();
    let new_path = target.path.clone();

    let updated = store.update_folder_location(folder.id, target).await?;

    let cascade = Cascade::new(store, &old_path, &new_path, concurrency);
    cascade.folders.fetch_add(1, Ordering::SeqCst);
    if let Err(err) = cascade
        .descend(old_path.clone(), new_path.clone())
        .await
    {
        warn!(
            folder_id = %folder.id,
            old_path = %old_path,
            new_path = %new_path,
            error = %err,
            "Cascade stopped partway"
        );
        return Err(err);
    }

    Ok(Relocation {
        folder: updated,
        report: cascade.report(),
    })
}

/// Finish a cascade whose root already reads `new_path` by rewriting every
/// folder and file still carrying the `old_path` prefix.
pub(crate) async fn sweep_prefix(
    store: &dyn NamespaceStore,
    old_path: &str,
    new_path: &str,
    concurrency: usize,
) -> AppResult<CascadeReport> {
    let cascade = Cascade::new(store, old_path, new_path, concurrency);
    if let Err(err) = cascade.sweep().await {
        warn!(old_path, new_path, error = %err, "Sweep stopped partway");
        return Err(err);
    }
    Ok(cascade.report())
}
