//! # docvault-store
//!
//! [`ObjectStore`](docvault_core::traits::ObjectStore) implementations: an
//! in-memory store (tests, single-process deployments) and a local
//! filesystem store.

pub mod local;
pub mod memory;

pub use local::LocalObjectStore;
pub use memory::MemoryObjectStore;
