//! # docvault-entity
//!
//! Domain entities for DocVault: the virtual filesystem entry model and its
//! index sort-key encoding.

pub mod entry;

pub use entry::{CreateFileEntry, EntryKind, EntryPatch, FileSystemEntry};
