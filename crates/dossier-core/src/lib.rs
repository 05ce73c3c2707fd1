//! # dossier-core
//!
//! Core crate for Dossier. Contains the materialized-path model,
//! configuration schemas, typed identifiers, sort types, the
//! object-storage trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Dossier crates.

pub mod config;
pub mod error;
pub mod path;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, CascadeCheckpoint, ErrorKind};
pub use result::AppResult;
