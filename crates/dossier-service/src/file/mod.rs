//! File attach, detach, move, upload, and search services.

pub mod search;
pub mod service;
pub mod upload;

pub use search::{SearchOutcome, SearchService};
pub use service::{FileService, NewFile};
pub use upload::UploadService;
