//! Folder management: creation, cascade, reconciliation, breadcrumbs.

pub mod breadcrumb;
pub mod cascade;
pub mod reconcile;
pub mod service;

pub use cascade::{CascadeReport, Relocation};
pub use reconcile::{IntegrityViolation, ReconcileReport};
pub use service::{CreateFolderRequest, FolderService};
