//! Folder create / rename / delete with explicit two-phase sequencing.
//!
//! The object store is flat, so a folder is a key-prefix convention plus a
//! zero-byte placeholder marker that keeps the prefix listable. Renaming a
//! folder is inherently copy+delete over every object under the prefix —
//! an O(n-objects) operation, kept explicit here.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::object_store::{ObjectMeta, ObjectStore};
use docvault_core::types::VirtualPath;
use docvault_entity::FileSystemEntry;
use docvault_index::MetadataIndex;

use crate::context::RequestContext;
use crate::validate;

/// Content type recorded on placeholder marker objects.
pub const FOLDER_MARKER_CONTENT_TYPE: &str = "application/x-directory";

/// How the copy phase of a folder rename is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenameMode {
    /// Copy objects one at a time (default).
    #[default]
    Sequential,
    /// Issue all copies concurrently; deletes still only start after every
    /// copy has succeeded.
    Batched,
}

/// Manages folder create, rename, and delete.
#[derive(Clone)]
pub struct FolderOperations {
    /// Object store boundary.
    store: Arc<dyn ObjectStore>,
    /// Metadata index boundary.
    index: Arc<dyn MetadataIndex>,
}

impl std::fmt::Debug for FolderOperations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderOperations").finish()
    }
}

impl FolderOperations {
    /// Creates a new folder operations service.
    pub fn new(store: Arc<dyn ObjectStore>, index: Arc<dyn MetadataIndex>) -> Self {
        Self { store, index }
    }

    /// Creates a folder under `parent_path`.
    ///
    /// Phase 1 writes the placeholder marker; a failure there leaves no
    /// state behind and is safe to retry as-is. Phase 2 inserts the index
    /// row; a failure there leaves the marker orphaned and comes back
    /// flagged `storage_orphan` — the caller must refresh, not retry
    /// blindly (the path-keyed upsert makes an eventual re-insert
    /// idempotent).
    pub async fn create(
        &self,
        ctx: &RequestContext,
        parent_path: &VirtualPath,
        name: &str,
    ) -> AppResult<FileSystemEntry> {
        let name = name.trim();
        validate::entry_name(name)?;

        let new_path = parent_path.join(name);
        let marker_key = ctx.scope.storage_key_prefix(&new_path);

        // Phase 1: zero-byte marker makes the prefix listable.
        self.store
            .put(&marker_key, Bytes::new(), Some(FOLDER_MARKER_CONTENT_TYPE))
            .await?;

        // Phase 2: index row.
        let parent = new_path.parent().unwrap_or_default();
        let entry = FileSystemEntry::new_folder(name, parent);
        self.index
            .upsert(&ctx.scope, &entry)
            .await
            .map_err(|e| e.flag_storage_orphan())?;

        info!(
            user_id = %ctx.user_id,
            scope = %ctx.scope,
            path = %new_path,
            "Folder created"
        );

        Ok(entry)
    }

    /// Renames a folder, relocating every object under its prefix.
    ///
    /// Sequencing: copy every object to the new prefix (mode decides
    /// sequential vs. concurrent), create the new marker, delete all old
    /// objects including the old marker, then rewrite the index rows. The
    /// entry `id` never changes. A failure inside the copy or delete phase
    /// surfaces as `PartialRename`: content may exist under both prefixes
    /// and the user must refresh.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        entry: &FileSystemEntry,
        new_name: &str,
        mode: RenameMode,
    ) -> AppResult<FileSystemEntry> {
        if !entry.is_folder() {
            return Err(AppError::validation("Not a folder"));
        }
        validate::not_workflow_owned(entry)?;
        let new_name = new_name.trim();
        validate::entry_name(new_name)?;

        let old_path = entry.path();
        let new_path = entry.parent_path.join(new_name);
        if new_path == old_path {
            return Ok(entry.clone());
        }

        let old_prefix = ctx.scope.storage_key_prefix(&old_path);
        let new_prefix = ctx.scope.storage_key_prefix(&new_path);

        // Page through everything under the old prefix. Very large folders
        // make this slow; the cost stays visible rather than truncated.
        let objects = self.list_all(&old_prefix).await?;
        let to_copy: Vec<ObjectMeta> = objects
            .iter()
            .filter(|meta| meta.key != old_prefix)
            .cloned()
            .collect();
        let total = to_copy.len();

        match mode {
            RenameMode::Sequential => {
                for (done, meta) in to_copy.iter().enumerate() {
                    self.copy_object(meta, &old_prefix, &new_prefix)
                        .await
                        .map_err(|e| partial_copy_error(done, total, &old_path, &new_path, e))?;
                }
            }
            RenameMode::Batched => {
                let copies = to_copy
                    .iter()
                    .map(|meta| self.copy_object(meta, &old_prefix, &new_prefix));
                futures::future::try_join_all(copies)
                    .await
                    .map_err(|e| partial_copy_error(0, total, &old_path, &new_path, e))?;
            }
        }

        // All copies succeeded: new marker, then remove the old objects.
        self.store
            .put(&new_prefix, Bytes::new(), Some(FOLDER_MARKER_CONTENT_TYPE))
            .await
            .map_err(|e| duplicate_prefix_error(&old_path, &new_path, e))?;

        for meta in &objects {
            self.store
                .delete(&meta.key)
                .await
                .map_err(|e| duplicate_prefix_error(&old_path, &new_path, e))?;
        }

        // Storage is done; rewrite the index rows.
        let touched = self
            .index
            .update_paths(&ctx.scope, &old_path, &new_path)
            .await
            .map_err(|e| e.flag_storage_orphan())?;

        info!(
            user_id = %ctx.user_id,
            scope = %ctx.scope,
            old = %old_path,
            new = %new_path,
            objects = total,
            rows = touched,
            "Folder renamed"
        );

        self.index
            .find_by_id(&ctx.scope, entry.id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder row vanished after rename"))
    }

    /// Deletes a folder and everything under it.
    ///
    /// The index rows are removed first so the folder disappears from
    /// listings immediately, even while the bulk object removal is still in
    /// flight; the reverse order would let users navigate into a folder the
    /// index no longer lists but storage still serves.
    pub async fn delete(&self, ctx: &RequestContext, entry: &FileSystemEntry) -> AppResult<()> {
        if !entry.is_folder() {
            return Err(AppError::validation("Not a folder"));
        }
        validate::not_workflow_owned(entry)?;

        let path = entry.path();
        let removed = self.index.delete_by_path(&ctx.scope, &path).await?;
        if removed == 0 {
            // Another actor deleted it between list and operate.
            return Err(AppError::not_found(format!("Folder not found: {path}")));
        }

        let prefix = ctx.scope.storage_key_prefix(&path);
        let objects = self.list_all(&prefix).await?;
        let object_count = objects.len();
        for meta in objects {
            if let Err(e) = self.store.delete(&meta.key).await {
                // The entry is already gone from listings; report the
                // leftover objects instead of pretending nothing happened.
                warn!(key = %meta.key, error = %e, "Object removal failed after index delete");
                return Err(AppError::storage_write(format!(
                    "Folder '{path}' was removed from the index but some objects \
                     could not be deleted; a later cleanup or retry is required"
                ))
                .flag_storage_orphan());
            }
        }

        info!(
            user_id = %ctx.user_id,
            scope = %ctx.scope,
            path = %path,
            rows = removed,
            objects = object_count,
            "Folder deleted"
        );

        Ok(())
    }

    /// Collect every object under a prefix, paging until exhausted.
    async fn list_all(&self, prefix: &str) -> AppResult<Vec<ObjectMeta>> {
        let mut items = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let page = self.store.list(prefix, token.as_deref()).await?;
            items.extend(page.items);
            match page.next_page_token {
                Some(t) => token = Some(t),
                None => break,
            }
        }
        Ok(items)
    }

    /// Download+re-upload one object under the new prefix, preserving its
    /// content type.
    async fn copy_object(
        &self,
        meta: &ObjectMeta,
        old_prefix: &str,
        new_prefix: &str,
    ) -> AppResult<()> {
        let rest = meta.key.strip_prefix(old_prefix).unwrap_or(&meta.key);
        let new_key = format!("{new_prefix}{rest}");
        let data = self.store.get(&meta.key).await?;
        self.store
            .put(&new_key, data, meta.content_type.as_deref())
            .await
    }
}

fn partial_copy_error(
    done: usize,
    total: usize,
    old_path: &VirtualPath,
    new_path: &VirtualPath,
    cause: AppError,
) -> AppError {
    AppError::with_source(
        docvault_core::error::ErrorKind::PartialRename,
        format!(
            "Rename copy phase failed after {done}/{total} objects; content may exist \
             under both '{old_path}' and '{new_path}' — refresh and re-check"
        ),
        cause,
    )
}

fn duplicate_prefix_error(
    old_path: &VirtualPath,
    new_path: &VirtualPath,
    cause: AppError,
) -> AppError {
    AppError::with_source(
        docvault_core::error::ErrorKind::PartialRename,
        format!(
            "Rename cleanup failed; content exists under both '{old_path}' and \
             '{new_path}' — refresh and re-check"
        ),
        cause,
    )
}
