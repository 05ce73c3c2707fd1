//! Reconciliation and integrity audit.
//!
//! Reconciliation walks a subtree by parent links, top-down, and rewrites
//! any folder whose `path`, `parent_path`, or `depth` disagrees with its
//! parent's current path, re-pointing files left under the old path. On a
//! consistent subtree it only reads.

use std::collections::{BTreeMap, HashSet};

use futures::{StreamExt, TryStreamExt, stream};
use serde::{Deserialize, Serialize};
use tracing::debug;

use dossier_core::error::AppError;
use dossier_core::path;
use dossier_core::result::AppResult;
use dossier_core::types::{FileId, FolderId};
use dossier_entity::folder::{Folder, FolderLocation};
use dossier_store::NamespaceStore;

use super::cascade;

/// Outcome of a reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// Folders inspected, including the starting folder.
    pub folders_checked: u64,
    /// Folder records rewritten.
    pub folders_repaired: u64,
    /// File records re-pointed.
    pub files_repaired: u64,
}

impl ReconcileReport {
    /// Total number of store writes.
    pub fn writes(&self) -> u64 {
        self.folders_repaired + self.files_repaired
    }

    /// Whether the pass found nothing to fix.
    pub fn is_clean(&self) -> bool {
        self.writes() == 0
    }
}

/// A broken invariant found by [`audit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityViolation {
    /// `path` is not `join(parent_path, name)`.
    PathMismatch {
        folder_id: FolderId,
        path: String,
        expected: String,
    },
    /// `depth` is not the segment count of `path`.
    DepthMismatch {
        folder_id: FolderId,
        path: String,
        depth: u32,
        expected: u32,
    },
    /// `parent_path` names no existing folder.
    MissingParent {
        folder_id: FolderId,
        path: String,
        parent_path: String,
    },
    /// Several folders share one path.
    DuplicatePath {
        path: String,
        folder_ids: Vec<FolderId>,
    },
    /// A file's container is neither a folder path nor the root sentinel.
    DanglingFile {
        file_id: FileId,
        container_path: String,
    },
}

/// A folder whose children still need checking. `stale` is the path it had
/// before this pass repaired it, under which its contents may still sit.
struct Pending {
    path: String,
    stale: Option<String>,
}

/// Repair `folder` and everything below it.
///
/// `stale_prefix` names a path whose remaining contents belong under
/// `folder` (typically [`CascadeCheckpoint::stale_path`] after a partial
/// cascade). It must not be occupied by another folder.
///
/// [`CascadeCheckpoint::stale_path`]: dossier_core::error::CascadeCheckpoint::stale_path
pub(crate) async fn reconcile(
    store: &dyn NamespaceStore,
    folder: Folder,
    stale_prefix: Option<&str>,
    concurrency: usize,
) -> AppResult<ReconcileReport> {
    let concurrency = concurrency.max(1);
    let mut report = ReconcileReport {
        folders_checked: 1,
        ..ReconcileReport::default()
    };

    let mut stale_prefixes: Vec<String> = stale_prefix
        .filter(|prefix| !prefix.is_empty())
        .map(str::to_string)
        .into_iter()
        .collect();

    let expected = FolderLocation::new(folder.parent_path.as_deref(), &folder.name);
    let root = if folder.location() == expected {
        folder
    } else {
        let updated = store.update_folder_location(folder.id, expected).await?;
        report.folders_repaired += 1;
        if updated.path != folder.path {
            stale_prefixes.push(folder.path.clone());
        }
        updated
    };

    for stale in &stale_prefixes {
        if *stale == root.path {
            continue;
        }
        if let Some(occupant) = store.find_folder_by_path(stale).await? {
            if occupant.id != root.id {
                return Err(AppError::conflict(format!(
                    "Stale path '{stale}' is occupied by folder {}",
                    occupant.id
                )));
            }
        }
        let swept = cascade::sweep_prefix(store, stale, &root.path, concurrency).await?;
        report.folders_repaired += swept.folders_updated;
        report.files_repaired += swept.files_updated;
    }

    let mut visited: HashSet<FolderId> = HashSet::from([root.id]);
    let mut frontier = vec![Pending {
        path: root.path.clone(),
        stale: None,
    }];

    while !frontier.is_empty() {
        let gathered: Vec<(String, Vec<Folder>, u64)> = stream::iter(frontier)
            .map(|pending| gather(store, pending))
            .buffer_unordered(concurrency)
            .try_collect()
            .await?;

        let mut checks = Vec::new();
        for (parent, children, files_repaired) in gathered {
            report.files_repaired += files_repaired;
            for child in children {
                // A corrupt parent link could otherwise revisit a folder forever.
                if visited.insert(child.id) {
                    checks.push((parent.clone(), child));
                }
            }
        }
        report.folders_checked += checks.len() as u64;

        let fixed: Vec<(Pending, bool)> = stream::iter(checks)
            .map(|(parent, child)| repair_child(store, parent, child))
            .buffer_unordered(concurrency)
            .try_collect()
            .await?;

        frontier = Vec::with_capacity(fixed.len());
        for (pending, repaired) in fixed {
            if repaired {
                report.folders_repaired += 1;
            }
            frontier.push(pending);
        }
    }

    debug!(
        folder_id = %root.id,
        path = %root.path,
        checked = report.folders_checked,
        writes = report.writes(),
        "Reconciled subtree"
    );
    Ok(report)
}

/// Children of a pending folder, plus the number of files moved out of its
/// stale path.
async fn gather(
    store: &dyn NamespaceStore,
    pending: Pending,
) -> AppResult<(String, Vec<Folder>, u64)> {
    let mut children = store.list_folders_by_parent(Some(&pending.path)).await?;
    let mut files_repaired = 0;

    if let Some(stale) = &pending.stale {
        children.extend(store.list_folders_by_parent(Some(stale)).await?);
        for file in store.list_files_by_container(stale).await? {
            store.update_file_container(file.id, &pending.path).await?;
            files_repaired += 1;
        }
    }
    Ok((pending.path, children, files_repaired))
}

async fn repair_child(
    store: &dyn NamespaceStore,
    parent: String,
    child: Folder,
) -> AppResult<(Pending, bool)> {
    let expected = FolderLocation::new(Some(&parent), &child.name);
    if child.location() == expected {
        let pending = Pending {
            path: child.path,
            stale: None,
        };
        return Ok((pending, false));
    }

    let updated = store.update_folder_location(child.id, expected).await?;
    let stale = (updated.path != child.path).then_some(child.path);
    Ok((
        Pending {
            path: updated.path,
            stale,
        },
        true,
    ))
}

/// Scan every record and report each broken invariant. Read-only.
pub(crate) async fn audit(store: &dyn NamespaceStore) -> AppResult<Vec<IntegrityViolation>> {
    let mut folders = store.list_all_folders().await?;
    folders.sort_by(|a, b| a.path.cmp(&b.path));

    let mut by_path: BTreeMap<&str, Vec<FolderId>> = BTreeMap::new();
    for folder in &folders {
        by_path.entry(folder.path.as_str()).or_default().push(folder.id);
    }

    let mut violations = Vec::new();
    for folder in &folders {
        let expected = folder.expected_path();
        if folder.path != expected {
            violations.push(IntegrityViolation::PathMismatch {
                folder_id: folder.id,
                path: folder.path.clone(),
                expected,
            });
        }
        let expected_depth = path::depth_of(&folder.path);
        if folder.depth != expected_depth {
            violations.push(IntegrityViolation::DepthMismatch {
                folder_id: folder.id,
                path: folder.path.clone(),
                depth: folder.depth,
                expected: expected_depth,
            });
        }
        if let Some(parent) = &folder.parent_path {
            if !by_path.contains_key(parent.as_str()) {
                violations.push(IntegrityViolation::MissingParent {
                    folder_id: folder.id,
                    path: folder.path.clone(),
                    parent_path: parent.clone(),
                });
            }
        }
    }

    for (path, ids) in &by_path {
        if ids.len() > 1 {
            violations.push(IntegrityViolation::DuplicatePath {
                path: path.to_string(),
                folder_ids: ids.clone(),
            });
        }
    }

    let mut files = store.list_all_files().await?;
    files.sort_by(|a, b| a.container_path.cmp(&b.container_path));
    for file in files {
        if file.container_path != path::ROOT_CONTAINER
            && !by_path.contains_key(file.container_path.as_str())
        {
            violations.push(IntegrityViolation::DanglingFile {
                file_id: file.id,
                container_path: file.container_path,
            });
        }
    }

    Ok(violations)
}
