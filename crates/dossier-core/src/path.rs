//! Materialized-path model.
//!
//! A folder path is a sequence of non-empty segments joined by [`SEPARATOR`]
//! (e.g. `"A/B/C"`). Root folders have single-segment paths and no parent.
//! Files point at their folder's path, or at [`ROOT_CONTAINER`] when they
//! live at the top level.
//!
//! Everything here is pure and does no I/O.

use crate::error::AppError;
use crate::result::AppResult;

/// Segment separator inside a materialized path.
pub const SEPARATOR: char = '/';

/// Container key used by files that live outside any folder.
pub const ROOT_CONTAINER: &str = "root";

/// Whether an ancestry test accepts the ancestor itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    /// `candidate == ancestor` counts as a match.
    Inclusive,
    /// Only strict descendants match.
    Exclusive,
}

/// Join a parent path and a segment. An absent or empty parent yields the
/// segment itself.
pub fn join(parent: Option<&str>, name: &str) -> String {
    match parent {
        Some(parent) if !parent.is_empty() => format!("{parent}{SEPARATOR}{name}"),
        _ => name.to_string(),
    }
}

/// All segments but the last, or `None` for a single-segment path.
pub fn parent_of(path: &str) -> Option<&str> {
    path.rsplit_once(SEPARATOR).map(|(parent, _)| parent)
}

/// The last segment of a path.
pub fn last_segment(path: &str) -> &str {
    path.rsplit_once(SEPARATOR)
        .map(|(_, name)| name)
        .unwrap_or(path)
}

/// Number of segments in `path`. The empty path has depth 0.
pub fn depth_of(path: &str) -> u32 {
    if path.is_empty() {
        0
    } else {
        path.split(SEPARATOR).count() as u32
    }
}

/// Iterate over the segments of `path`.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(|segment| !segment.is_empty())
}

/// Progressive joins of the segments of `path`: `"A/B/C"` yields
/// `["A", "A/B", "A/B/C"]`.
pub fn prefixes(path: &str) -> Vec<String> {
    let mut current: Option<String> = None;
    segments(path)
        .map(|segment| {
            let next = join(current.as_deref(), segment);
            current = Some(next.clone());
            next
        })
        .collect()
}

/// Whether `candidate` lies below `ancestor`.
pub fn is_descendant(candidate: &str, ancestor: &str, inclusion: Inclusion) -> bool {
    if candidate == ancestor {
        return inclusion == Inclusion::Inclusive;
    }
    candidate.len() > ancestor.len()
        && candidate.starts_with(ancestor)
        && candidate[ancestor.len()..].starts_with(SEPARATOR)
}

/// Replace the leading `old_prefix` of `path` with `new_prefix`.
///
/// Returns `None` when `path` is neither `old_prefix` nor below it.
pub fn rewrite_prefix(path: &str, old_prefix: &str, new_prefix: &str) -> Option<String> {
    if !is_descendant(path, old_prefix, Inclusion::Inclusive) {
        return None;
    }
    Some(format!("{new_prefix}{}", &path[old_prefix.len()..]))
}

/// Map an optional folder path to the key files use as `container_path`.
pub fn container_key(folder_path: Option<&str>) -> &str {
    match folder_path {
        Some(path) if !path.is_empty() => path,
        _ => ROOT_CONTAINER,
    }
}

/// Normalize a caller-supplied parent: the empty string means "top level".
pub fn normalize_parent(parent: Option<&str>) -> Option<&str> {
    parent.filter(|p| !p.is_empty())
}

/// Check that `name` is usable as a single path segment.
pub fn validate_segment(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Name cannot be empty"));
    }
    if name.contains(SEPARATOR) {
        return Err(AppError::validation(format!(
            "Name '{name}' cannot contain '{SEPARATOR}'"
        )));
    }
    if name.trim() != name {
        return Err(AppError::validation(format!(
            "Name '{name}' cannot start or end with whitespace"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join() {
        assert_eq!(join(None, "A"), "A");
        assert_eq!(join(Some(""), "A"), "A");
        assert_eq!(join(Some("A/B"), "C"), "A/B/C");
    }

    #[test]
    fn test_parent_and_last_segment() {
        assert_eq!(parent_of("A"), None);
        assert_eq!(parent_of("A/B/C"), Some("A/B"));
        assert_eq!(last_segment("A/B/C"), "C");
        assert_eq!(last_segment("A"), "A");
    }

    #[test]
    fn test_depth() {
        assert_eq!(depth_of(""), 0);
        assert_eq!(depth_of("A"), 1);
        assert_eq!(depth_of("A/B/C"), 3);
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(prefixes("A/B/C"), vec!["A", "A/B", "A/B/C"]);
        assert!(prefixes("").is_empty());
    }

    #[test]
    fn test_is_descendant_respects_segment_boundary() {
        assert!(is_descendant("A/B", "A", Inclusion::Exclusive));
        assert!(is_descendant("A", "A", Inclusion::Inclusive));
        assert!(!is_descendant("A", "A", Inclusion::Exclusive));
        assert!(!is_descendant("AB/C", "A", Inclusion::Inclusive));
        assert!(!is_descendant("B/A", "A", Inclusion::Inclusive));
    }

    #[test]
    fn test_rewrite_prefix() {
        assert_eq!(rewrite_prefix("A/B/C", "A", "A2").as_deref(), Some("A2/B/C"));
        assert_eq!(rewrite_prefix("A", "A", "X/A").as_deref(), Some("X/A"));
        assert_eq!(rewrite_prefix("AB/C", "A", "A2"), None);
    }

    #[test]
    fn test_rewrite_only_touches_leading_prefix() {
        // The old prefix also appears later in the path.
        assert_eq!(
            rewrite_prefix("A/x/A", "A", "Z").as_deref(),
            Some("Z/x/A")
        );
    }

    #[test]
    fn test_container_key() {
        assert_eq!(container_key(None), ROOT_CONTAINER);
        assert_eq!(container_key(Some("")), ROOT_CONTAINER);
        assert_eq!(container_key(Some("A/B")), "A/B");
    }

    #[test]
    fn test_validate_segment() {
        assert!(validate_segment("1 - Expertise").is_ok());
        assert!(validate_segment("").is_err());
        assert!(validate_segment("   ").is_err());
        assert!(validate_segment("a/b").is_err());
        assert!(validate_segment(" padded").is_err());
    }
}
