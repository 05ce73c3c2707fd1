//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dossier_core::path::ROOT_CONTAINER;
use dossier_core::types::{ActorId, FileId};

/// A file attached to a folder by path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// Store-assigned identifier. Comment threads are keyed by it.
    pub id: FileId,
    /// The file name (including extension).
    pub name: String,
    /// Lowercase extension of `name` (empty when there is none).
    pub media_type: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Path of the folder holding the file, or the root sentinel.
    pub container_path: String,
    /// Location in object storage. Immutable once set.
    pub storage_key: String,
    /// Cached retrieval URL.
    pub url: String,
    /// When the upload completed.
    pub uploaded_at: DateTime<Utc>,
    /// Who uploaded the file.
    pub uploaded_by: ActorId,
}

impl File {
    /// Whether the file lives outside any folder.
    pub fn is_at_root(&self) -> bool {
        self.container_path == ROOT_CONTAINER
    }

    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFile {
    /// The file name.
    pub name: String,
    /// Extension-derived media type.
    pub media_type: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Container folder path or root sentinel.
    pub container_path: String,
    /// Key of the already-stored object.
    pub storage_key: String,
    /// Retrieval URL of the stored object.
    pub url: String,
    /// The uploader.
    pub uploaded_by: ActorId,
}

fn extension_of(name: &str) -> Option<String> {
    name.rsplit('.')
        .next()
        .filter(|ext| *ext != name)
        .map(|ext| ext.to_lowercase())
}

/// Media type recorded for a file name: its lowercase extension, or an
/// empty string when the name has none.
pub fn media_type_for(name: &str) -> String {
    extension_of(name).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_from_extension() {
        assert_eq!(media_type_for("Report.PDF"), "pdf");
        assert_eq!(media_type_for("archive.tar.gz"), "gz");
        assert_eq!(media_type_for("README"), "");
    }
}
