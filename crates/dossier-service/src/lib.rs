//! # dossier-service
//!
//! The namespace engine. Services orchestrate the namespace store and the
//! object store to implement folder and file use cases on top of a flat
//! document substrate.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time via `Arc` references.

pub mod context;
pub mod file;
pub mod folder;
pub mod seed;

pub use context::RequestContext;
pub use file::{FileService, NewFile, SearchOutcome, SearchService, UploadService};
pub use folder::{
    CascadeReport, CreateFolderRequest, FolderService, IntegrityViolation, ReconcileReport,
    Relocation,
};
