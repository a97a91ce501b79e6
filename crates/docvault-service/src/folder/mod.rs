//! Folder operations.

pub mod service;

pub use service::{FOLDER_MARKER_CONTENT_TYPE, FolderOperations, RenameMode};
