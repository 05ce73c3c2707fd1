//! # dossier-store
//!
//! The only layer that talks to the document store. Exposes the
//! [`NamespaceStore`] capability consumed by the namespace engine, the
//! strict document codec used at the store boundary, and an in-memory
//! backend used for embedding and tests.

pub mod document;
pub mod memory;
pub mod repository;

pub use memory::MemoryNamespaceStore;
pub use repository::NamespaceStore;
