//! Domain types shared across all DocVault crates.

pub mod path;
pub mod scope;

pub use path::VirtualPath;
pub use scope::UserScope;
