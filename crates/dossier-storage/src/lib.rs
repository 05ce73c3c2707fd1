//! # dossier-storage
//!
//! Object storage providers for Dossier: an in-memory provider and a
//! local filesystem provider, selected at runtime by [`ObjectStoreManager`],
//! plus the storage key layout used for uploads.

pub mod key;
pub mod manager;
pub mod providers;

pub use manager::ObjectStoreManager;
