//! Folder domain entities.

pub mod breadcrumb;
pub mod listing;
pub mod model;

pub use breadcrumb::BreadcrumbEntry;
pub use listing::{ChildListing, sort_folders};
pub use model::{CreateFolder, Folder, FolderLocation};
