//! File domain entities.

pub mod model;
pub mod sort;

pub use model::{CreateFile, File, media_type_for};
pub use sort::sort_files;
