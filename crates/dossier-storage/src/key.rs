//! Storage key layout for uploaded files.
//!
//! Keys look like `{prefix}/{container}/{millis}_{sanitized name}` where the
//! container is the folder path or the root sentinel. The key is fixed at
//! upload time and never follows later folder renames.

use chrono::{DateTime, Utc};

use dossier_core::path;

/// Replace every character outside `[A-Za-z0-9.-]` with `_`.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Build the object key for a file uploaded into `folder_path` at `now`.
pub fn upload_key(prefix: &str, folder_path: Option<&str>, name: &str, now: DateTime<Utc>) -> String {
    let container = path::container_key(path::normalize_parent(folder_path));
    let prefix = prefix.trim_end_matches('/');
    format!(
        "{prefix}/{container}/{}_{}",
        now.timestamp_millis(),
        sanitize_name(name)
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_sanitize_replaces_everything_else() {
        assert_eq!(sanitize_name("Rapport final (v2).pdf"), "Rapport_final__v2_.pdf");
        assert_eq!(sanitize_name("été.txt"), "_t_.txt");
        assert_eq!(sanitize_name("plain-name.1.doc"), "plain-name.1.doc");
    }

    #[test]
    fn test_upload_key_layout() {
        let now = Utc.timestamp_millis_opt(1_714_557_600_123).unwrap();
        assert_eq!(
            upload_key("files", Some("A/B"), "My File.pdf", now),
            "files/A/B/1714557600123_My_File.pdf"
        );
        assert_eq!(
            upload_key("files/", None, "x.txt", now),
            "files/root/1714557600123_x.txt"
        );
        assert_eq!(
            upload_key("files", Some(""), "x.txt", now),
            "files/root/1714557600123_x.txt"
        );
    }
}
