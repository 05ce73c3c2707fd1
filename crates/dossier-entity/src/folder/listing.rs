//! Directory listing value objects.

use serde::{Deserialize, Serialize};

use crate::file::File;
use crate::folder::Folder;

/// Direct children of one container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChildListing {
    /// Subfolders in display order.
    pub folders: Vec<Folder>,
    /// Files in the caller-selected order.
    pub files: Vec<File>,
}

impl ChildListing {
    /// Whether the container holds nothing.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }
}

/// Order folders by `order` ascending; duplicate orders (from concurrent
/// creates) fall back to the case-insensitive name, then the exact name and
/// id so the result never depends on store iteration order.
pub fn sort_folders(folders: &mut [Folder]) {
    folders.sort_by(|a, b| {
        a.order
            .cmp(&b.order)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
}
