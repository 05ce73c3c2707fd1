//! # Dossier
//!
//! A hierarchical folder/file namespace over a flat document store.
//! [`Dossier::bootstrap`] wires the namespace store, the object store, and
//! every service from an [`AppConfig`].

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

pub use dossier_core::config::AppConfig;
pub use dossier_core::config::logging::LoggingConfig;
pub use dossier_core::error::{AppError, CascadeCheckpoint, ErrorKind};
pub use dossier_core::result::AppResult;
pub use dossier_service::RequestContext;

use dossier_core::traits::object_store::ObjectStore;
use dossier_service::{FileService, FolderService, SearchService, UploadService};
use dossier_storage::ObjectStoreManager;
use dossier_store::{MemoryNamespaceStore, NamespaceStore};

/// A fully wired namespace engine.
#[derive(Debug, Clone)]
pub struct Dossier {
    /// Configuration the services were built from.
    pub config: AppConfig,
    /// Namespace store shared by every service.
    pub store: Arc<dyn NamespaceStore>,
    /// Object store holding file bytes.
    pub objects: Arc<dyn ObjectStore>,
    /// Folder tree operations.
    pub folders: FolderService,
    /// File record operations.
    pub files: FileService,
    /// Upload pipeline.
    pub uploads: UploadService,
    /// Flat file search.
    pub search: SearchService,
}

impl Dossier {
    /// Build every service from configuration.
    ///
    /// The namespace lives in an in-memory store; the object store is chosen
    /// by `storage.provider`. Default folders are seeded when configured.
    pub async fn bootstrap(config: AppConfig) -> AppResult<Self> {
        config.validate()?;
        let objects = ObjectStoreManager::new(&config.storage).await?;
        let dossier = Self::with_stores(
            config,
            Arc::new(MemoryNamespaceStore::new()),
            Arc::new(objects),
        );

        let seeded = dossier
            .folders
            .seed_default_folders(&RequestContext::system())
            .await?;

        info!(
            version = env!("CARGO_PKG_VERSION"),
            storage = dossier.objects.provider_type(),
            seeded = seeded.len(),
            "Dossier ready"
        );
        Ok(dossier)
    }

    /// Wire the services over existing stores.
    pub fn with_stores(
        config: AppConfig,
        store: Arc<dyn NamespaceStore>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        let folders = FolderService::new(store.clone(), config.namespace.clone());
        let files = FileService::new(store.clone(), objects.clone(), config.upload.clone());
        let uploads = UploadService::new(files.clone(), objects.clone());
        let search = SearchService::new(store.clone());

        Self {
            config,
            store,
            objects,
            folders,
            files,
            uploads,
            search,
        }
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Fails if a
/// subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let installed = match config.format.as_str() {
        "json" => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .try_init(),
        _ => fmt()
            .pretty()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
    };

    installed.map_err(|e| AppError::internal(format!("Failed to install logging: {e}")))
}
