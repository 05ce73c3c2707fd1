//! In-memory namespace store.

pub mod store;

pub use store::MemoryNamespaceStore;
