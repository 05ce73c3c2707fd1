//! Breadcrumb trail entries.

use serde::{Deserialize, Serialize};

/// One step of a breadcrumb trail, from the synthetic root down to the
/// current folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadcrumbEntry {
    /// Display name: the folder's `name`, or the raw segment when no
    /// record exists for this prefix.
    pub name: String,
    /// Folder path this entry navigates to (`""` for the root entry).
    pub path: String,
}

impl BreadcrumbEntry {
    /// The synthetic root entry.
    pub fn root(label: impl Into<String>) -> Self {
        Self {
            name: label.into(),
            path: String::new(),
        }
    }

    /// Whether this is the synthetic root entry.
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }
}
