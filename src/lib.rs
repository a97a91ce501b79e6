//! # DocVault
//!
//! The virtual hierarchical filesystem layer of a tax-document portal:
//! folders and files over a flat object store, kept in sync with a
//! partition+sort-key metadata index.
//!
//! This umbrella crate re-exports the public surface of the workspace
//! crates for consumers that want a single dependency.

pub use docvault_core::config;
pub use docvault_core::error::{AppError, ErrorKind};
pub use docvault_core::logging;
pub use docvault_core::result::AppResult;
pub use docvault_core::traits::object_store::{ObjectMeta, ObjectPage, ObjectStore};
pub use docvault_core::types::{UserScope, VirtualPath};

pub use docvault_entity::{CreateFileEntry, EntryKind, EntryPatch, FileSystemEntry};

pub use docvault_index::{MemoryMetadataIndex, MetadataIndex};
pub use docvault_store::{LocalObjectStore, MemoryObjectStore};

pub use docvault_cache::SignedUrlCache;
pub use docvault_service::{
    BatchUploadReport, Breadcrumb, EntryResolver, FileOperations, FolderOperations,
    ProgressCallback, RenameMode, RequestContext, SearchEngine, UploadProgress, UploadRequest,
};
