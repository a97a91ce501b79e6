//! Collaborator boundary traits.

pub mod object_store;

pub use object_store::{ObjectMeta, ObjectPage, ObjectStore};
