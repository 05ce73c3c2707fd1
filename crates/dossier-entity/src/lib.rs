//! # dossier-entity
//!
//! Record schemas for the Dossier namespace. Every struct in this crate
//! is either a stored record (`Folder`, `File`), the payload used to create
//! or rewrite one, or a read-side value object assembled from records.
//! All derive `Debug`, `Clone`, `Serialize`, and `Deserialize`.

pub mod file;
pub mod folder;
