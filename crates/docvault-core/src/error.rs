//! Unified application error types for DocVault.
//!
//! Every operation against the object store or the metadata index can fail
//! independently, so errors are tagged with the *phase* that failed. All
//! crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire layer.
///
/// The storage/index read/write split is what lets callers decide whether a
/// naive retry is safe: a phase-1 failure left no state behind, a phase-2
/// failure did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Reading from the object store failed.
    StorageRead,
    /// Writing to (or deleting from) the object store failed.
    StorageWrite,
    /// Reading from the metadata index failed.
    IndexRead,
    /// Writing to the metadata index failed.
    IndexWrite,
    /// The requested entry was not found (it may have vanished between
    /// listing and operating).
    NotFound,
    /// A folder rename's copy phase completed only partially; objects may
    /// exist under both the old and the new prefix.
    PartialRename,
    /// Input validation failed.
    Validation,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// A cache error occurred.
    Cache,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StorageRead => write!(f, "STORAGE_READ"),
            Self::StorageWrite => write!(f, "STORAGE_WRITE"),
            Self::IndexRead => write!(f, "INDEX_READ"),
            Self::IndexWrite => write!(f, "INDEX_WRITE"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::PartialRename => write!(f, "PARTIAL_RENAME"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Cache => write!(f, "CACHE"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout DocVault.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. The `storage_orphan` flag marks phase-2
/// (index) failures that left a successful object-store write behind with no
/// matching index row: the caller must refresh and re-check index state
/// rather than blindly retry.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// True when an object-store write succeeded but the matching index
    /// write did not.
    pub storage_orphan: bool,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            storage_orphan: false,
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            storage_orphan: false,
            source: Some(Box::new(source)),
        }
    }

    /// Create a storage-read error.
    pub fn storage_read(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StorageRead, message)
    }

    /// Create a storage-write error.
    pub fn storage_write(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StorageWrite, message)
    }

    /// Create an index-read error.
    pub fn index_read(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IndexRead, message)
    }

    /// Create an index-write error.
    pub fn index_write(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IndexWrite, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a partial-rename error.
    pub fn partial_rename(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PartialRename, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a cache error.
    pub fn cache(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cache, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Mark this error as having left an orphaned object-store write behind.
    pub fn flag_storage_orphan(mut self) -> Self {
        self.storage_orphan = true;
        self
    }

    /// Whether a naive retry of the failed operation is safe.
    ///
    /// A phase-1 (storage) failure left no state behind, so retrying the
    /// whole operation is harmless. Any failure that follows a successful
    /// storage write is not.
    pub fn is_retry_safe(&self) -> bool {
        !self.storage_orphan && self.kind != ErrorKind::PartialRename
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            storage_orphan: self.storage_orphan,
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::StorageRead, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
