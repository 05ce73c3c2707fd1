//! Sorting types for file listings and search results.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Orient an ascending comparison result for this direction.
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }

    /// The opposite direction.
    pub fn toggled(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// File attribute a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileSortField {
    /// Display name, case-insensitive.
    #[default]
    Name,
    /// Extension-derived media type, case-insensitive.
    MediaType,
    /// Size in bytes.
    Size,
    /// Upload time.
    UploadedAt,
}

/// A sort specification for files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileSort {
    /// Attribute to order by.
    #[serde(default)]
    pub field: FileSortField,
    /// Sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl FileSort {
    /// Create a new sort specification.
    pub fn new(field: FileSortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Ascending sort on the given field.
    pub fn asc(field: FileSortField) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    /// Descending sort on the given field.
    pub fn desc(field: FileSortField) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Selecting the current field again flips the direction; a new field
    /// starts ascending.
    pub fn select(self, field: FileSortField) -> Self {
        if self.field == field {
            Self::new(field, self.direction.toggled())
        } else {
            Self::asc(field)
        }
    }
}
