//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dossier_core::path;
use dossier_core::types::{ActorId, FolderId};

/// A folder in the namespace, stored as a flat record.
///
/// `path` is always `join(parent_path, name)` and `depth` is its segment
/// count; both are recomputed on every rewrite, never edited on their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Store-assigned identifier.
    pub id: FolderId,
    /// Display name, the last path segment.
    pub name: String,
    /// Full materialized path (e.g., `A/B/C`). Unique among folders.
    pub path: String,
    /// Number of segments in `path` (1 for root folders).
    pub depth: u32,
    /// Path of the containing folder (`None` for root folders).
    pub parent_path: Option<String>,
    /// Display position among siblings. Not unique under races.
    pub order: u32,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// Who created the folder.
    pub created_by: ActorId,
}

impl Folder {
    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_path.is_none()
    }

    /// The path this folder should have given its parent and name.
    pub fn expected_path(&self) -> String {
        path::join(self.parent_path.as_deref(), &self.name)
    }

    /// Whether `path`, `depth`, and `parent_path` agree with each other.
    pub fn is_consistent(&self) -> bool {
        self.path == self.expected_path()
            && self.depth == path::depth_of(&self.path)
            && path::parent_of(&self.path) == self.parent_path.as_deref()
    }

    /// Current location fields.
    pub fn location(&self) -> FolderLocation {
        FolderLocation {
            name: self.name.clone(),
            path: self.path.clone(),
            parent_path: self.parent_path.clone(),
            depth: self.depth,
        }
    }
}

/// The mutable location fields of a folder, rewritten together in one
/// single-document update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderLocation {
    /// New display name.
    pub name: String,
    /// New materialized path.
    pub path: String,
    /// New parent path.
    pub parent_path: Option<String>,
    /// New depth.
    pub depth: u32,
}

impl FolderLocation {
    /// Derive `path` and `depth` from a parent and a name.
    pub fn new(parent_path: Option<&str>, name: &str) -> Self {
        let parent_path = path::normalize_parent(parent_path).map(str::to_string);
        let full = path::join(parent_path.as_deref(), name);
        Self {
            name: name.to_string(),
            depth: path::depth_of(&full),
            path: full,
            parent_path,
        }
    }

    /// Derive the location from a full path.
    pub fn from_path(full: &str) -> Self {
        Self::new(path::parent_of(full), path::last_segment(full))
    }
}

/// Data required to create a new folder record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// Full materialized path.
    pub path: String,
    /// Depth in the tree.
    pub depth: u32,
    /// Parent path (None for root).
    pub parent_path: Option<String>,
    /// Sibling display order.
    pub order: u32,
    /// Who is creating the folder.
    pub created_by: ActorId,
}

impl CreateFolder {
    /// Build the record for `name` under `parent_path`.
    pub fn new(parent_path: Option<&str>, name: &str, order: u32, created_by: ActorId) -> Self {
        let location = FolderLocation::new(parent_path, name);
        Self {
            name: location.name,
            path: location.path,
            depth: location.depth,
            parent_path: location.parent_path,
            order,
            created_by,
        }
    }
}
