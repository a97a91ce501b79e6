//! In-memory metadata index.
//!
//! Partitions (one per vault scope) map to ordered row tables keyed by the
//! `TYPE#id` sort key. Query semantics match the hosted index the portal
//! runs against: prefix-scoped listings, case-insensitive name search, and
//! path-rewrite on folder renames.

use std::collections::BTreeMap;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{UserScope, VirtualPath};
use docvault_entity::{EntryKind, EntryPatch, FileSystemEntry};

use crate::traits::MetadataIndex;

/// In-memory metadata index.
#[derive(Debug, Default)]
pub struct MemoryMetadataIndex {
    /// partition key -> (sort key -> row)
    partitions: DashMap<String, BTreeMap<String, FileSystemEntry>>,
}

impl MemoryMetadataIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total row count in a scope. Test/diagnostic helper.
    pub fn row_count(&self, scope: &UserScope) -> usize {
        self.partitions
            .get(&scope.partition_key())
            .map(|rows| rows.len())
            .unwrap_or(0)
    }

    /// Whether `row` sits at `path` or anywhere below it.
    fn row_under_path(row: &FileSystemEntry, path: &VirtualPath) -> bool {
        let row_path = row.path();
        row_path == *path || path.contains(&row_path)
    }

    /// Fill in the derived `child_count` for folder rows.
    fn with_child_count(
        rows: &BTreeMap<String, FileSystemEntry>,
        mut entry: FileSystemEntry,
    ) -> FileSystemEntry {
        if entry.kind == EntryKind::Folder {
            let own_path = entry.path();
            let count = rows
                .values()
                .filter(|r| r.parent_path == own_path)
                .count() as u64;
            entry.child_count = Some(count);
        }
        entry
    }
}

#[async_trait]
impl MetadataIndex for MemoryMetadataIndex {
    async fn upsert(&self, scope: &UserScope, entry: &FileSystemEntry) -> AppResult<()> {
        let mut partition = self
            .partitions
            .entry(scope.partition_key())
            .or_default();

        // Upsert is keyed by path: drop any row already at this path so a
        // retried insert or a sibling-name collision ends with one row.
        let path = entry.path();
        partition.retain(|_, row| row.path() != path);
        partition.insert(entry.sort_key(), entry.clone());

        debug!(scope = %scope, path = %path, sort_key = %entry.sort_key(), "Upserted index row");
        Ok(())
    }

    async fn update(
        &self,
        scope: &UserScope,
        id: Uuid,
        patch: EntryPatch,
    ) -> AppResult<FileSystemEntry> {
        let mut partition = self
            .partitions
            .entry(scope.partition_key())
            .or_default();

        let row = partition
            .values_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| AppError::not_found(format!("Index row not found: {id}")))?;

        if let Some(name) = patch.name {
            row.name = name;
        }
        if let Some(storage_key) = patch.storage_key {
            row.storage_key = Some(storage_key);
        }
        Ok(row.clone())
    }

    async fn delete_by_path(&self, scope: &UserScope, path: &VirtualPath) -> AppResult<u64> {
        let Some(mut partition) = self.partitions.get_mut(&scope.partition_key()) else {
            return Ok(0);
        };

        let before = partition.len();
        partition.retain(|_, row| !Self::row_under_path(row, path));
        let removed = (before - partition.len()) as u64;

        debug!(scope = %scope, path = %path, removed, "Deleted index rows");
        Ok(removed)
    }

    async fn find_by_id(&self, scope: &UserScope, id: Uuid) -> AppResult<Option<FileSystemEntry>> {
        Ok(self
            .partitions
            .get(&scope.partition_key())
            .and_then(|rows| {
                rows.values()
                    .find(|row| row.id == id)
                    .map(|row| Self::with_child_count(&rows, row.clone()))
            }))
    }

    async fn find_by_path(
        &self,
        scope: &UserScope,
        path: &VirtualPath,
    ) -> AppResult<Option<FileSystemEntry>> {
        Ok(self
            .partitions
            .get(&scope.partition_key())
            .and_then(|rows| {
                rows.values()
                    .find(|row| row.path() == *path)
                    .map(|row| Self::with_child_count(&rows, row.clone()))
            }))
    }

    async fn query_by_parent_path(
        &self,
        scope: &UserScope,
        parent: &VirtualPath,
    ) -> AppResult<Vec<FileSystemEntry>> {
        Ok(self
            .partitions
            .get(&scope.partition_key())
            .map(|rows| {
                rows.values()
                    .filter(|row| row.parent_path == *parent)
                    .map(|row| Self::with_child_count(&rows, row.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn query_by_name_substring(
        &self,
        scope: &UserScope,
        text: &str,
    ) -> AppResult<Vec<FileSystemEntry>> {
        let needle = text.to_lowercase();
        Ok(self
            .partitions
            .get(&scope.partition_key())
            .map(|rows| {
                rows.values()
                    .filter(|row| row.name.to_lowercase().contains(&needle))
                    .map(|row| Self::with_child_count(&rows, row.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update_paths(
        &self,
        scope: &UserScope,
        old_path: &VirtualPath,
        new_path: &VirtualPath,
    ) -> AppResult<u64> {
        let Some(mut partition) = self.partitions.get_mut(&scope.partition_key()) else {
            return Ok(0);
        };

        let old_key_prefix = scope.storage_key_prefix(old_path);
        let new_key_prefix = scope.storage_key_prefix(new_path);
        let old_hier = old_path.storage_hierarchy_path();
        let new_hier = new_path.storage_hierarchy_path();
        let mut touched = 0u64;

        for row in partition.values_mut() {
            let row_path = row.path();
            if row_path == *old_path {
                // The renamed folder itself.
                row.parent_path = new_path.parent().unwrap_or_default();
                if let Some(name) = new_path.name() {
                    row.name = name.to_string();
                }
                touched += 1;
            } else if old_path.contains(&row_path) {
                // Descendant: swap the path prefix, keep everything else.
                let rewritten = format!(
                    "{}{}",
                    new_hier.trim_end_matches('/'),
                    &row.parent_path.as_str()[old_hier.trim_end_matches('/').len()..]
                );
                row.parent_path = VirtualPath::normalize(&rewritten);
                if let Some(key) = &row.storage_key {
                    if let Some(rest) = key.strip_prefix(&old_key_prefix) {
                        row.storage_key = Some(format!("{new_key_prefix}{rest}"));
                    }
                }
                touched += 1;
            }
        }

        debug!(scope = %scope, old = %old_path, new = %new_path, touched, "Rewrote index paths");
        Ok(touched)
    }
}
