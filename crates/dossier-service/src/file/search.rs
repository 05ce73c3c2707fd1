//! Flat, hierarchy-blind file search by name.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use dossier_core::result::AppResult;
use dossier_core::types::FileSort;
use dossier_entity::file::{File, sort_files};
use dossier_store::NamespaceStore;

/// File search over every file, regardless of container.
#[derive(Debug, Clone)]
pub struct SearchService {
    /// Namespace store.
    store: Arc<dyn NamespaceStore>,
}

/// Result of a search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "files", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// The query was blank: the caller is not searching.
    Idle,
    /// Files whose name contains the query (possibly none).
    Matches(Vec<File>),
}

impl SearchOutcome {
    /// Whether a search actually ran.
    pub fn is_searching(&self) -> bool {
        matches!(self, Self::Matches(_))
    }

    /// Matching files; empty when idle.
    pub fn files(&self) -> &[File] {
        match self {
            Self::Idle => &[],
            Self::Matches(files) => files,
        }
    }
}

impl SearchService {
    /// Creates a new search service.
    pub fn new(store: Arc<dyn NamespaceStore>) -> Self {
        Self { store }
    }

    /// Case-insensitive substring match on file names across all files.
    ///
    /// The query is trimmed; a blank query returns [`SearchOutcome::Idle`].
    pub async fn search(&self, query: &str, sort: FileSort) -> AppResult<SearchOutcome> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(SearchOutcome::Idle);
        }

        let mut matches: Vec<File> = self
            .store
            .list_all_files()
            .await?
            .into_iter()
            .filter(|file| file.name.to_lowercase().contains(&needle))
            .collect();
        sort_files(&mut matches, sort);

        debug!(query = %needle, matches = matches.len(), "File search");
        Ok(SearchOutcome::Matches(matches))
    }
}

#[cfg(test)]
mod tests {
    use dossier_core::types::{ActorId, FileSortField};
    use dossier_entity::file::CreateFile;
    use dossier_store::MemoryNamespaceStore;

    use super::*;

    async fn attach(store: &MemoryNamespaceStore, container: &str, name: &str, size: u64) {
        store
            .insert_file(CreateFile {
                name: name.to_string(),
                media_type: dossier_entity::file::media_type_for(name),
                size_bytes: size,
                container_path: container.to_string(),
                storage_key: format!("files/{container}/1_{name}"),
                url: String::new(),
                uploaded_by: ActorId::new("tester"),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_blank_query_is_idle() {
        let service = SearchService::new(Arc::new(MemoryNamespaceStore::new()));
        for query in ["", "   ", "\t"] {
            let outcome = service.search(query, FileSort::default()).await.unwrap();
            assert_eq!(outcome, SearchOutcome::Idle);
            assert!(!outcome.is_searching());
        }
    }

    #[tokio::test]
    async fn test_matches_ignore_case_and_hierarchy() {
        let store = MemoryNamespaceStore::new();
        attach(&store, "X/Y", "Report.PDF", 30).await;
        attach(&store, "root", "annual-report.docx", 10).await;
        attach(&store, "Z", "photo.jpg", 20).await;
        let service = SearchService::new(Arc::new(store));

        let outcome = service
            .search("report", FileSort::asc(FileSortField::Size))
            .await
            .unwrap();
        let names: Vec<&str> = outcome.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["annual-report.docx", "Report.PDF"]);
    }

    #[tokio::test]
    async fn test_no_match_is_distinct_from_idle() {
        let service = SearchService::new(Arc::new(MemoryNamespaceStore::new()));
        let outcome = service.search("zzz", FileSort::default()).await.unwrap();
        assert!(outcome.is_searching());
        assert!(outcome.files().is_empty());
    }
}
