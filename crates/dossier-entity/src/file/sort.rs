//! File ordering for listings and search results.

use std::cmp::Ordering;

use dossier_core::types::{FileSort, FileSortField};

use super::model::File;

/// Sort `files` in place.
///
/// Ties on the selected field fall back to upload time, then id, oldest
/// first in both directions, so listings of the same records always agree.
pub fn sort_files(files: &mut [File], sort: FileSort) {
    files.sort_by(|a, b| {
        sort.direction
            .apply(compare(a, b, sort.field))
            .then_with(|| a.uploaded_at.cmp(&b.uploaded_at))
            .then_with(|| a.id.cmp(&b.id))
    });
}

fn compare(a: &File, b: &File, field: FileSortField) -> Ordering {
    match field {
        FileSortField::Name => compare_text(&a.name, &b.name),
        FileSortField::MediaType => compare_text(&a.media_type, &b.media_type),
        FileSortField::Size => a.size_bytes.cmp(&b.size_bytes),
        FileSortField::UploadedAt => a.uploaded_at.cmp(&b.uploaded_at),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use dossier_core::types::{ActorId, FileId};

    use super::*;

    fn file(name: &str, size: u64, age_minutes: i64) -> File {
        File {
            id: FileId::new(),
            name: name.to_string(),
            media_type: crate::file::media_type_for(name),
            size_bytes: size,
            container_path: "root".to_string(),
            storage_key: format!("files/root/{name}"),
            url: String::new(),
            uploaded_at: Utc::now() - Duration::minutes(age_minutes),
            uploaded_by: ActorId::new("tester"),
        }
    }

    fn names(files: &[File]) -> Vec<&str> {
        files.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_name_is_case_insensitive() {
        let mut files = vec![file("beta.txt", 1, 0), file("Alpha.txt", 1, 0), file("gamma.txt", 1, 0)];
        sort_files(&mut files, FileSort::asc(FileSortField::Name));
        assert_eq!(names(&files), vec!["Alpha.txt", "beta.txt", "gamma.txt"]);

        sort_files(&mut files, FileSort::desc(FileSortField::Name));
        assert_eq!(names(&files), vec!["gamma.txt", "beta.txt", "Alpha.txt"]);
    }

    #[test]
    fn test_size_is_numeric() {
        let mut files = vec![file("a", 100, 0), file("b", 9, 0), file("c", 20, 0)];
        sort_files(&mut files, FileSort::asc(FileSortField::Size));
        assert_eq!(names(&files), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_uploaded_at_is_chronological() {
        let mut files = vec![file("new", 1, 0), file("old", 1, 60), file("mid", 1, 30)];
        sort_files(&mut files, FileSort::asc(FileSortField::UploadedAt));
        assert_eq!(names(&files), vec!["old", "mid", "new"]);
    }

    #[test]
    fn test_ties_fall_back_to_upload_time() {
        let mut files = vec![file("y.pdf", 2, 5), file("z.doc", 3, 0), file("x.PDF", 1, 10)];
        sort_files(&mut files, FileSort::desc(FileSortField::MediaType));
        assert_eq!(names(&files), vec!["x.PDF", "y.pdf", "z.doc"]);

        sort_files(&mut files, FileSort::asc(FileSortField::MediaType));
        assert_eq!(names(&files), vec!["z.doc", "x.PDF", "y.pdf"]);
    }

    #[test]
    fn test_full_ties_are_ordered_by_id() {
        let at = Utc::now();
        let mut files: Vec<File> = (0..4)
            .map(|_| File {
                uploaded_at: at,
                ..file("same.txt", 1, 0)
            })
            .collect();
        let mut reversed = files.clone();
        reversed.reverse();

        sort_files(&mut files, FileSort::asc(FileSortField::Name));
        sort_files(&mut reversed, FileSort::asc(FileSortField::Name));
        let ids: Vec<FileId> = files.iter().map(|f| f.id).collect();
        let reversed_ids: Vec<FileId> = reversed.iter().map(|f| f.id).collect();
        assert_eq!(ids, reversed_ids);
    }
}
