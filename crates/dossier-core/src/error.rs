//! Unified application error types for Dossier.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Input was rejected before any write (bad name, missing parent).
    Validation,
    /// The requested path or identifier does not exist.
    NotFound,
    /// A folder still holds files or subfolders and cannot be deleted.
    FolderNotEmpty,
    /// The target path is already occupied by another folder.
    Conflict,
    /// Transient failure of the document store.
    StoreUnavailable,
    /// A rename/move cascade stopped partway through.
    PartialCascadeFailure,
    /// The object-storage collaborator failed.
    Storage,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl ErrorKind {
    /// Whether an operation that failed with this kind may be retried as-is.
    ///
    /// Only single-document operations are safe to replay; a partial cascade
    /// must go through `resume_cascade` or `reconcile` instead.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::FolderNotEmpty => write!(f, "FOLDER_NOT_EMPTY"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::StoreUnavailable => write!(f, "STORE_UNAVAILABLE"),
            Self::PartialCascadeFailure => write!(f, "PARTIAL_CASCADE_FAILURE"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// Where an interrupted rename/move cascade stopped.
///
/// `old_path`/`new_path` are the prefixes of the cascade root and
/// `stopped_at` is the current path of the deepest folder whose subtree
/// holds every record the cascade left stale, so a reconciliation pass can
/// target just that subtree. When a failure abandons siblings, this is
/// their common parent rather than the folder that failed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CascadeCheckpoint {
    /// Path of the cascade root before the rename/move.
    pub old_path: String,
    /// Path of the cascade root after the rename/move.
    pub new_path: String,
    /// New-prefixed path of the folder at which the cascade stopped.
    pub stopped_at: String,
}

impl CascadeCheckpoint {
    /// The path the stopped folder had before the cascade, i.e. the prefix
    /// its stale contents still carry.
    pub fn stale_path(&self) -> Option<String> {
        crate::path::rewrite_prefix(&self.stopped_at, &self.new_path, &self.old_path)
    }
}

/// The unified application error used throughout Dossier.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    /// Resumption data, present only for [`ErrorKind::PartialCascadeFailure`].
    pub checkpoint: Option<CascadeCheckpoint>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
            checkpoint: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
            checkpoint: None,
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a folder-not-empty error.
    pub fn folder_not_empty(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FolderNotEmpty, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a store-unavailable error.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreUnavailable, message)
    }

    /// Create a partial-cascade error wrapping the write failure that stopped it.
    pub fn partial_cascade(checkpoint: CascadeCheckpoint, cause: AppError) -> Self {
        Self {
            kind: ErrorKind::PartialCascadeFailure,
            message: format!(
                "Cascade '{}' -> '{}' stopped at '{}': {}",
                checkpoint.old_path, checkpoint.new_path, checkpoint.stopped_at, cause.message
            ),
            source: Some(Box::new(cause)),
            checkpoint: Some(checkpoint),
        }
    }

    /// Move the checkpoint of a partial-cascade error up to `stopped_at`, an
    /// ancestor of the folder it was recorded at. Other errors are unchanged.
    pub fn widen_checkpoint(mut self, stopped_at: &str) -> Self {
        if let Some(checkpoint) = self.checkpoint.as_mut() {
            self.message = self.message.replacen(
                &format!("stopped at '{}'", checkpoint.stopped_at),
                &format!("stopped at '{stopped_at}'"),
                1,
            );
            checkpoint.stopped_at = stopped_at.to_string();
        }
        self
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error may be retried without resumption logic.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
            checkpoint: self.checkpoint.clone(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
