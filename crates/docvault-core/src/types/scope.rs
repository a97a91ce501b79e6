//! Per-user vault scoping.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::path::VirtualPath;

/// The vault a request operates on.
///
/// Every object-store key and index row is scoped to one user's vault.
/// The scope owner is usually the authenticated caller; an authorized
/// professional viewing a client's documents gets a scope built from the
/// client's id. That grant is a capability validated by the caller, never a
/// path escape — keys produced here always stay under `private/{owner}/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserScope {
    /// The user whose vault this scope addresses.
    owner_id: Uuid,
}

impl UserScope {
    /// Scope over the given user's own vault.
    pub fn new(owner_id: Uuid) -> Self {
        Self { owner_id }
    }

    /// The vault owner.
    pub fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    /// The index partition key for this vault.
    pub fn partition_key(&self) -> String {
        format!("USER#{}", self.owner_id)
    }

    /// The object-store root prefix for this vault (with trailing slash).
    pub fn storage_root(&self) -> String {
        format!("private/{}/", self.owner_id)
    }

    /// The full object-store key prefix for a folder path in this vault.
    ///
    /// The root path maps to the bare vault prefix.
    pub fn storage_key_prefix(&self, path: &VirtualPath) -> String {
        if path.is_root() {
            self.storage_root()
        } else {
            format!(
                "{}{}",
                self.storage_root(),
                path.storage_hierarchy_path().trim_start_matches('/')
            )
        }
    }

    /// The full object-store key for a file named `name` under `parent`.
    pub fn storage_key_for_file(&self, parent: &VirtualPath, name: &str) -> String {
        format!("{}{}", self.storage_key_prefix(parent), name)
    }
}

impl fmt::Display for UserScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.partition_key())
    }
}
