//! Core type definitions used across the Dossier workspace.

pub mod actor;
pub mod id;
pub mod sorting;

pub use actor::ActorId;
pub use id::*;
pub use sorting::{FileSort, FileSortField, SortDirection};
