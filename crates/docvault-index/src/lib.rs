//! # docvault-index
//!
//! The metadata index boundary: structured entry rows keyed by a partition
//! key (vault scope) and a sort key (`TYPE#id`), queried by parent path or
//! name substring. Contains the [`MetadataIndex`] trait and the in-memory
//! implementation.

pub mod memory;
pub mod traits;

pub use memory::MemoryMetadataIndex;
pub use traits::MetadataIndex;
