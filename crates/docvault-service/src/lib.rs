//! # docvault-service
//!
//! The virtual filesystem operations: folder and file CRUD over the two
//! independently-failing collaborators (object store + metadata index),
//! child listing and breadcrumbs, debounced search, and batch upload.
//!
//! Every mutating operation is a *two-phase operation*: one object-store
//! call and one index call in a fixed order, with phase-tagged errors and
//! no automatic rollback of a completed phase.

pub mod context;
pub mod file;
pub mod folder;
pub mod resolver;
pub mod search;

mod validate;

pub use context::RequestContext;
pub use file::{
    BatchUploadReport, FileOperations, ProgressCallback, UploadProgress, UploadRequest,
};
pub use folder::{FolderOperations, RenameMode};
pub use resolver::{Breadcrumb, EntryResolver};
pub use search::SearchEngine;
