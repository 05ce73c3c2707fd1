//! Breadcrumb resolution.

use futures::future::try_join_all;

use dossier_core::path;
use dossier_core::result::AppResult;
use dossier_entity::folder::BreadcrumbEntry;
use dossier_store::NamespaceStore;

/// Resolve the breadcrumb trail for `folder_path`.
///
/// The trail always starts with a synthetic root entry labelled
/// `root_label`, followed by one entry per path segment. A prefix with no
/// folder record (mid-cascade or corrupted) falls back to the raw segment.
pub(crate) async fn resolve(
    store: &dyn NamespaceStore,
    root_label: &str,
    folder_path: Option<&str>,
) -> AppResult<Vec<BreadcrumbEntry>> {
    let prefixes = folder_path.map(path::prefixes).unwrap_or_default();

    let found = try_join_all(
        prefixes
            .iter()
            .map(|prefix| store.find_folder_by_path(prefix)),
    )
    .await?;

    let mut trail = Vec::with_capacity(prefixes.len() + 1);
    trail.push(BreadcrumbEntry::root(root_label));
    for (prefix, folder) in prefixes.into_iter().zip(found) {
        let name = match folder {
            Some(folder) => folder.name,
            None => path::last_segment(&prefix).to_string(),
        };
        trail.push(BreadcrumbEntry { name, path: prefix });
    }
    Ok(trail)
}
