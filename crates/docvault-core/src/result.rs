//! Result alias used across all DocVault crates.

use crate::error::AppError;

/// A `Result` specialized to [`AppError`].
pub type AppResult<T> = Result<T, AppError>;
