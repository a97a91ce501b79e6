//! Entry resolution: child listings and breadcrumbs.

use docvault_core::result::AppResult;
use docvault_core::types::{UserScope, VirtualPath};
use docvault_entity::FileSystemEntry;
use docvault_index::MetadataIndex;
use serde::{Deserialize, Serialize};

/// One step of a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Path to navigate to when the crumb is clicked.
    pub path: VirtualPath,
    /// Display label.
    pub label: String,
}

/// Label used for the root crumb, distinct from any path segment.
pub const ROOT_LABEL: &str = "Home";

/// Maps raw index rows to ordered, user-facing listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryResolver;

impl EntryResolver {
    /// Sort entries in the user-facing listing order: folders before files
    /// and images, then case-sensitive lexicographic by name.
    ///
    /// This ordering is a user-facing contract; the name tie-break keeps it
    /// deterministic for entries of equal kind.
    pub fn sort_children(mut entries: Vec<FileSystemEntry>) -> Vec<FileSystemEntry> {
        entries.sort_by(|a, b| {
            b.is_folder()
                .cmp(&a.is_folder())
                .then_with(|| a.name.cmp(&b.name))
        });
        entries
    }

    /// Filter an entry set down to the direct children of `current_path`,
    /// in listing order. Pure; used when the caller already holds rows.
    pub fn list_children(
        entries: &[FileSystemEntry],
        current_path: &VirtualPath,
    ) -> Vec<FileSystemEntry> {
        let children = entries
            .iter()
            .filter(|e| e.parent_path == *current_path)
            .cloned()
            .collect();
        Self::sort_children(children)
    }

    /// Query the index for the children of `current_path`, in listing order.
    pub async fn children(
        index: &dyn MetadataIndex,
        scope: &UserScope,
        current_path: &VirtualPath,
    ) -> AppResult<Vec<FileSystemEntry>> {
        let entries = index.query_by_parent_path(scope, current_path).await?;
        Ok(Self::sort_children(entries))
    }

    /// Split a path into breadcrumb steps. The root crumb is always present
    /// and labeled [`ROOT_LABEL`].
    pub fn breadcrumbs(current_path: &VirtualPath) -> Vec<Breadcrumb> {
        let mut crumbs = vec![Breadcrumb {
            path: VirtualPath::root(),
            label: ROOT_LABEL.to_string(),
        }];
        let mut acc = VirtualPath::root();
        for segment in current_path.segments() {
            acc = acc.join(segment);
            crumbs.push(Breadcrumb {
                path: acc.clone(),
                label: segment.to_string(),
            });
        }
        crumbs
    }
}
