//! Metadata index trait.

use async_trait::async_trait;
use uuid::Uuid;

use docvault_core::result::AppResult;
use docvault_core::types::{UserScope, VirtualPath};
use docvault_entity::{EntryPatch, FileSystemEntry};

/// Trait for the structured entry index.
///
/// Rows are addressed by a partition key (the vault scope) plus a sort key
/// encoding `TYPE#id`. The index fails independently of the object store;
/// implementations tag read failures `ErrorKind::IndexRead` and write
/// failures `ErrorKind::IndexWrite` so two-phase callers can classify them.
#[async_trait]
pub trait MetadataIndex: Send + Sync + std::fmt::Debug + 'static {
    /// Insert or replace the row for this entry.
    ///
    /// Upsert is keyed by the entry's *path*: a second insert at the same
    /// path replaces the first (last writer wins on sibling-name
    /// collisions), which also makes phase-2 retries idempotent.
    async fn upsert(&self, scope: &UserScope, entry: &FileSystemEntry) -> AppResult<()>;

    /// Apply a partial update to the row with the given id.
    async fn update(
        &self,
        scope: &UserScope,
        id: Uuid,
        patch: EntryPatch,
    ) -> AppResult<FileSystemEntry>;

    /// Remove the row at the given path and, for folders, every row under
    /// it. Returns the number of rows removed.
    async fn delete_by_path(&self, scope: &UserScope, path: &VirtualPath) -> AppResult<u64>;

    /// Look up a row by entry id.
    async fn find_by_id(&self, scope: &UserScope, id: Uuid) -> AppResult<Option<FileSystemEntry>>;

    /// Look up a row by its entry path.
    async fn find_by_path(
        &self,
        scope: &UserScope,
        path: &VirtualPath,
    ) -> AppResult<Option<FileSystemEntry>>;

    /// All direct children of a folder path. Folder rows come back with
    /// `child_count` derived at query time.
    async fn query_by_parent_path(
        &self,
        scope: &UserScope,
        parent: &VirtualPath,
    ) -> AppResult<Vec<FileSystemEntry>>;

    /// Case-insensitive substring match on `name`, across all paths in the
    /// scope.
    async fn query_by_name_substring(
        &self,
        scope: &UserScope,
        text: &str,
    ) -> AppResult<Vec<FileSystemEntry>>;

    /// Rewrite path fields after a folder rename: the folder row itself
    /// plus the `parent_path` and `storage_key` prefixes of every
    /// descendant row. Returns the number of rows touched.
    async fn update_paths(
        &self,
        scope: &UserScope,
        old_path: &VirtualPath,
        new_path: &VirtualPath,
    ) -> AppResult<u64>;
}
