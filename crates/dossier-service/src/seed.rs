//! First-run seeding of the default root folders.

use tracing::{debug, info};

use dossier_core::result::AppResult;
use dossier_entity::folder::Folder;

use crate::context::RequestContext;
use crate::folder::FolderService;
use crate::folder::service::CreateFolderRequest;

impl FolderService {
    /// Creates the configured default root folders, in order, when seeding
    /// is enabled and the store holds no folder at all.
    ///
    /// Returns the folders created; empty when there was nothing to do.
    pub async fn seed_default_folders(&self, ctx: &RequestContext) -> AppResult<Vec<Folder>> {
        if !self.config().seed_default_folders {
            debug!("Default folder seeding disabled");
            return Ok(Vec::new());
        }
        if !self.store().list_all_folders().await?.is_empty() {
            debug!("Namespace already populated, skipping seed");
            return Ok(Vec::new());
        }

        let names = self.config().default_folders.clone();
        let mut created = Vec::with_capacity(names.len());
        for name in names {
            let folder = self
                .create_folder(ctx, CreateFolderRequest::new(None, name))
                .await?;
            created.push(folder);
        }

        info!(count = created.len(), "Seeded default folders");
        Ok(created)
    }
}
