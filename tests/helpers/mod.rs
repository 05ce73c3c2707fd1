//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use bytes::Bytes;

use dossier::{AppConfig, Dossier, RequestContext};
use dossier_entity::file::File;
use dossier_entity::folder::Folder;
use dossier_service::CreateFolderRequest;
use dossier_storage::providers::MemoryObjectStore;
use dossier_store::MemoryNamespaceStore;

/// Test application context over in-memory stores.
pub struct TestApp {
    /// The wired services.
    pub dossier: Dossier,
    /// Direct handle on the namespace store (fault injection, write counts).
    pub store: MemoryNamespaceStore,
    /// Direct handle on the object store.
    pub objects: MemoryObjectStore,
    /// Caller used for every mutation.
    pub ctx: RequestContext,
}

impl TestApp {
    /// Create a new test application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new test application with the given configuration.
    pub fn with_config(config: AppConfig) -> Self {
        let store = MemoryNamespaceStore::new();
        let objects = MemoryObjectStore::new();
        let dossier = Dossier::with_stores(
            config,
            Arc::new(store.clone()),
            Arc::new(objects.clone()),
        );
        Self {
            dossier,
            store,
            objects,
            ctx: RequestContext::new("test-user"),
        }
    }

    /// Create a folder, panicking on failure.
    pub async fn mkdir(&self, parent: Option<&str>, name: &str) -> Folder {
        self.dossier
            .folders
            .create_folder(&self.ctx, CreateFolderRequest::new(parent, name))
            .await
            .expect("create folder")
    }

    /// Create every folder along `path`.
    pub async fn mkdir_p(&self, path: &str) -> Folder {
        let mut parent: Option<String> = None;
        let mut last = None;
        for segment in path.split('/') {
            let folder = match self
                .dossier
                .folders
                .find_folder(&dossier_core::path::join(parent.as_deref(), segment))
                .await
                .expect("lookup")
            {
                Some(existing) => existing,
                None => self.mkdir(parent.as_deref(), segment).await,
            };
            parent = Some(folder.path.clone());
            last = Some(folder);
        }
        last.expect("non-empty path")
    }

    /// Upload a small file, panicking on failure.
    pub async fn upload(&self, container: Option<&str>, name: &str) -> File {
        self.dossier
            .uploads
            .upload(&self.ctx, container, name, Bytes::from(name.to_string()))
            .await
            .expect("upload")
    }

    /// The folder at `path`, panicking if it is missing.
    pub async fn folder(&self, path: &str) -> Folder {
        self.dossier
            .folders
            .find_folder(path)
            .await
            .expect("lookup")
            .unwrap_or_else(|| panic!("folder '{path}' missing"))
    }

    /// Assert every folder and file satisfies the path invariants.
    pub async fn assert_consistent(&self) {
        let violations = self.dossier.folders.audit().await.expect("audit");
        assert!(violations.is_empty(), "violations: {violations:#?}");
    }
}
