//! Strict document codec for the store boundary.
//!
//! Documents are camelCase JSON objects keyed by their identifier. Decoding
//! rejects unknown fields and malformed shapes (`Serialization`) and records
//! that break the path invariants (`Validation`), so a loosely-typed key bag
//! never reaches the engine.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use dossier_core::error::AppError;
use dossier_core::path;
use dossier_core::result::AppResult;
use dossier_core::types::{ActorId, FileId, FolderId};
use dossier_entity::file::File;
use dossier_entity::folder::Folder;

/// Stored shape of a folder document (the identifier is the document key).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FolderDocument {
    /// Display name.
    pub name: String,
    /// Materialized path.
    pub path: String,
    /// Segment count of `path`.
    pub depth: u32,
    /// Parent path; `null` for roots.
    pub parent_path: Option<String>,
    /// Sibling order.
    pub order: u32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Creator.
    pub created_by: ActorId,
}

/// Stored shape of a file document (the identifier is the document key).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileDocument {
    /// File name.
    pub name: String,
    /// Extension-derived media type.
    pub media_type: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Container folder path or root sentinel.
    pub container_path: String,
    /// Object-storage key.
    pub storage_key: String,
    /// Retrieval URL.
    pub url: String,
    /// Upload time.
    pub uploaded_at: DateTime<Utc>,
    /// Uploader.
    pub uploaded_by: ActorId,
}

/// A dump of both collections, keyed by document identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    /// Folder documents.
    #[serde(default)]
    pub folders: BTreeMap<String, Value>,
    /// File documents.
    #[serde(default)]
    pub files: BTreeMap<String, Value>,
}

/// Decode and validate a folder document.
pub fn decode_folder(id: &str, value: Value) -> AppResult<Folder> {
    let id: FolderId = id
        .parse()
        .map_err(|e| AppError::serialization(format!("Invalid folder id '{id}': {e}")))?;
    let doc: FolderDocument = serde_json::from_value(value).map_err(|e| {
        AppError::with_source(
            dossier_core::ErrorKind::Serialization,
            format!("Malformed folder document {id}: {e}"),
            e,
        )
    })?;

    path::validate_segment(&doc.name)?;
    let folder = Folder {
        id,
        name: doc.name,
        path: doc.path,
        depth: doc.depth,
        parent_path: doc.parent_path,
        order: doc.order,
        created_at: doc.created_at,
        created_by: doc.created_by,
    };
    if !folder.is_consistent() {
        return Err(AppError::validation(format!(
            "Folder document {id} is inconsistent: path '{}', parent {:?}, depth {}",
            folder.path, folder.parent_path, folder.depth
        )));
    }
    Ok(folder)
}

/// Decode and validate a file document.
pub fn decode_file(id: &str, value: Value) -> AppResult<File> {
    let id: FileId = id
        .parse()
        .map_err(|e| AppError::serialization(format!("Invalid file id '{id}': {e}")))?;
    let doc: FileDocument = serde_json::from_value(value).map_err(|e| {
        AppError::with_source(
            dossier_core::ErrorKind::Serialization,
            format!("Malformed file document {id}: {e}"),
            e,
        )
    })?;

    if doc.name.trim().is_empty() {
        return Err(AppError::validation(format!("File document {id} has no name")));
    }
    if doc.container_path.is_empty() {
        return Err(AppError::validation(format!(
            "File document {id} has no container"
        )));
    }
    Ok(File {
        id,
        name: doc.name,
        media_type: doc.media_type,
        size_bytes: doc.size_bytes,
        container_path: doc.container_path,
        storage_key: doc.storage_key,
        url: doc.url,
        uploaded_at: doc.uploaded_at,
        uploaded_by: doc.uploaded_by,
    })
}

/// Encode a folder as `(document id, document body)`.
pub fn encode_folder(folder: &Folder) -> AppResult<(String, Value)> {
    let doc = FolderDocument {
        name: folder.name.clone(),
        path: folder.path.clone(),
        depth: folder.depth,
        parent_path: folder.parent_path.clone(),
        order: folder.order,
        created_at: folder.created_at,
        created_by: folder.created_by.clone(),
    };
    Ok((folder.id.to_string(), serde_json::to_value(doc)?))
}

/// Encode a file as `(document id, document body)`.
pub fn encode_file(file: &File) -> AppResult<(String, Value)> {
    let doc = FileDocument {
        name: file.name.clone(),
        media_type: file.media_type.clone(),
        size_bytes: file.size_bytes,
        container_path: file.container_path.clone(),
        storage_key: file.storage_key.clone(),
        url: file.url.clone(),
        uploaded_at: file.uploaded_at,
        uploaded_by: file.uploaded_by.clone(),
    };
    Ok((file.id.to_string(), serde_json::to_value(doc)?))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use dossier_core::ErrorKind;

    const FOLDER_ID: &str = "6f1c8f2a-1d7e-4c59-9a4e-3c0f6b1f7a10";

    fn folder_doc() -> Value {
        json!({
            "name": "B",
            "path": "A/B",
            "depth": 2,
            "parentPath": "A",
            "order": 1,
            "createdAt": "2024-05-01T10:00:00Z",
            "createdBy": "user-1"
        })
    }

    #[test]
    fn test_decodes_well_formed_folder() {
        let folder = decode_folder(FOLDER_ID, folder_doc()).expect("decode");
        assert_eq!(folder.path, "A/B");
        assert_eq!(folder.parent_path.as_deref(), Some("A"));
        assert_eq!(folder.created_by.as_str(), "user-1");
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let mut doc = folder_doc();
        doc["niveau"] = json!(2);
        let err = decode_folder(FOLDER_ID, doc).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Serialization);
    }

    #[test]
    fn test_rejects_wrong_types() {
        let mut doc = folder_doc();
        doc["depth"] = json!("two");
        let err = decode_folder(FOLDER_ID, doc).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Serialization);
    }

    #[test]
    fn test_rejects_inconsistent_path() {
        let mut doc = folder_doc();
        doc["depth"] = json!(3);
        let err = decode_folder(FOLDER_ID, doc).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_rejects_bad_identifier() {
        let err = decode_folder("not-a-uuid", folder_doc()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Serialization);
    }

    #[test]
    fn test_file_requires_container() {
        let doc = json!({
            "name": "Report.pdf",
            "mediaType": "pdf",
            "sizeBytes": 10,
            "containerPath": "",
            "storageKey": "files/root/1_Report.pdf",
            "url": "memory://files/root/1_Report.pdf",
            "uploadedAt": "2024-05-01T10:00:00Z",
            "uploadedBy": "user-1"
        });
        let err = decode_file(FOLDER_ID, doc).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_encode_then_decode_preserves_folder() {
        let folder = decode_folder(FOLDER_ID, folder_doc()).expect("decode");
        let (id, body) = encode_folder(&folder).expect("encode");
        assert_eq!(decode_folder(&id, body).expect("decode again"), folder);
    }
}
