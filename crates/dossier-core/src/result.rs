//! Convenience result type alias for Dossier.

use crate::error::AppError;

/// A specialized `Result` type for Dossier operations.
pub type AppResult<T> = Result<T, AppError>;
