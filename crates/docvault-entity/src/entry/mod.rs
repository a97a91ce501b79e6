//! Virtual filesystem entry entities.

pub mod model;

pub use model::{CreateFileEntry, EntryKind, EntryPatch, FileSystemEntry};
