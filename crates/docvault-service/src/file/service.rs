//! File upload / rename / delete with the same two-phase discipline as
//! folders, without the recursive prefix handling.

use std::sync::Arc;

use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use docvault_core::config::upload::UploadConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::object_store::ObjectStore;
use docvault_core::types::VirtualPath;
use docvault_entity::{CreateFileEntry, EntryPatch, FileSystemEntry};
use docvault_index::MetadataIndex;

use crate::context::RequestContext;
use crate::validate;

/// One file to upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// File name (including extension).
    pub file_name: String,
    /// MIME type, used to classify FILE vs IMAGE.
    pub mime_type: Option<String>,
    /// File content.
    pub data: Bytes,
    /// Optional document-request back-reference.
    pub linked_request_id: Option<Uuid>,
}

/// A progress report for one upload task.
#[derive(Debug, Clone)]
pub struct UploadProgress {
    /// The file being transferred.
    pub file_name: String,
    /// Bytes transferred so far.
    pub transferred: u64,
    /// Total bytes.
    pub total: u64,
}

/// Callback invoked with per-file progress reports.
pub type ProgressCallback = Arc<dyn Fn(UploadProgress) + Send + Sync>;

/// Outcome of a batch upload: per-file results, never all-or-nothing.
#[derive(Debug, Default)]
pub struct BatchUploadReport {
    /// Entries created successfully.
    pub completed: Vec<FileSystemEntry>,
    /// Failed files with their file-specific errors.
    pub failed: Vec<(String, AppError)>,
}

impl BatchUploadReport {
    /// Whether every file in the batch completed.
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Manages file upload, rename, and delete.
#[derive(Clone)]
pub struct FileOperations {
    /// Object store boundary.
    store: Arc<dyn ObjectStore>,
    /// Metadata index boundary.
    index: Arc<dyn MetadataIndex>,
    /// Upload limits.
    config: UploadConfig,
}

impl std::fmt::Debug for FileOperations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileOperations").finish()
    }
}

impl FileOperations {
    /// Creates a new file operations service.
    pub fn new(
        store: Arc<dyn ObjectStore>,
        index: Arc<dyn MetadataIndex>,
        config: UploadConfig,
    ) -> Self {
        Self {
            store,
            index,
            config,
        }
    }

    /// Uploads one file into `parent_path`.
    ///
    /// Phase 1 writes the object (retryable as-is on failure); phase 2
    /// inserts the index row (`storage_orphan`-flagged on failure).
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        parent_path: &VirtualPath,
        request: UploadRequest,
        progress: Option<ProgressCallback>,
    ) -> AppResult<FileSystemEntry> {
        let name = request.file_name.trim().to_string();
        validate::entry_name(&name)?;

        let total = request.data.len() as u64;
        if total > self.config.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "'{name}' exceeds the maximum upload size of {} bytes",
                self.config.max_upload_size_bytes
            )));
        }

        let storage_key = ctx.scope.storage_key_for_file(parent_path, &name);

        report(&progress, &name, 0, total);

        // Phase 1: object bytes.
        self.store
            .put(&storage_key, request.data, request.mime_type.as_deref())
            .await?;

        report(&progress, &name, total, total);

        // Phase 2: index row.
        let entry = FileSystemEntry::new_file(CreateFileEntry {
            name: name.clone(),
            parent_path: parent_path.clone(),
            storage_key,
            mime_type: request.mime_type,
            size_bytes: total,
            linked_request_id: request.linked_request_id,
        });
        self.index
            .upsert(&ctx.scope, &entry)
            .await
            .map_err(|e| e.flag_storage_orphan())?;

        info!(
            user_id = %ctx.user_id,
            scope = %ctx.scope,
            path = %entry.path(),
            size = total,
            kind = ?entry.kind,
            "File uploaded"
        );

        Ok(entry)
    }

    /// Uploads a batch of files concurrently, one task per file.
    ///
    /// A failing file yields one error entry in the report while the other
    /// files complete; the batch is never all-or-nothing.
    pub async fn upload_batch(
        &self,
        ctx: &RequestContext,
        parent_path: &VirtualPath,
        requests: Vec<UploadRequest>,
        progress: Option<ProgressCallback>,
    ) -> AppResult<BatchUploadReport> {
        if requests.len() > self.config.max_files_per_batch {
            return Err(AppError::validation(format!(
                "Batch of {} files exceeds the limit of {}",
                requests.len(),
                self.config.max_files_per_batch
            )));
        }

        let tasks = requests.into_iter().map(|request| {
            let file_name = request.file_name.clone();
            let progress = progress.clone();
            async move {
                let result = self.upload(ctx, parent_path, request, progress).await;
                (file_name, result)
            }
        });

        let mut report = BatchUploadReport::default();
        for (file_name, result) in futures::future::join_all(tasks).await {
            match result {
                Ok(entry) => report.completed.push(entry),
                Err(e) => report.failed.push((file_name, e)),
            }
        }

        info!(
            user_id = %ctx.user_id,
            scope = %ctx.scope,
            completed = report.completed.len(),
            failed = report.failed.len(),
            "Batch upload finished"
        );

        Ok(report)
    }

    /// Renames a file: copy the single object to its new key, delete the
    /// old one, then update the index row. `id` and `kind` never change.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        entry: &FileSystemEntry,
        new_name: &str,
    ) -> AppResult<FileSystemEntry> {
        if entry.is_folder() {
            return Err(AppError::validation("Use folder rename for folders"));
        }
        validate::not_workflow_owned(entry)?;
        let new_name = new_name.trim();
        validate::entry_name(new_name)?;

        let old_key = entry
            .storage_key
            .clone()
            .ok_or_else(|| AppError::internal("File entry has no storage key"))?;
        let new_key = ctx.scope.storage_key_for_file(&entry.parent_path, new_name);
        if new_key == old_key {
            return Ok(entry.clone());
        }

        // Copy, then delete. No move primitive exists at the store.
        let data = self.store.get(&old_key).await?;
        self.store
            .put(&new_key, data, entry.mime_type.as_deref())
            .await?;
        self.store.delete(&old_key).await.map_err(|e| {
            AppError::with_source(
                docvault_core::error::ErrorKind::PartialRename,
                format!(
                    "'{}' was copied to '{new_name}' but the old object could not \
                     be removed — refresh and re-check",
                    entry.name
                ),
                e,
            )
        })?;

        // Storage done; update the row.
        let updated = self
            .index
            .update(
                &ctx.scope,
                entry.id,
                EntryPatch {
                    name: Some(new_name.to_string()),
                    storage_key: Some(new_key),
                },
            )
            .await
            .map_err(|e| e.flag_storage_orphan())?;

        info!(
            user_id = %ctx.user_id,
            scope = %ctx.scope,
            old = %entry.name,
            new = %new_name,
            "File renamed"
        );

        Ok(updated)
    }

    /// Deletes a file. The index row goes first so the entry disappears
    /// from listings immediately, then the object.
    pub async fn delete(&self, ctx: &RequestContext, entry: &FileSystemEntry) -> AppResult<()> {
        if entry.is_folder() {
            return Err(AppError::validation("Use folder delete for folders"));
        }
        validate::not_workflow_owned(entry)?;

        let path = entry.path();
        let removed = self.index.delete_by_path(&ctx.scope, &path).await?;
        if removed == 0 {
            return Err(AppError::not_found(format!("File not found: {path}")));
        }

        if let Some(key) = &entry.storage_key {
            self.store.delete(key).await.map_err(|e| {
                AppError::with_source(
                    docvault_core::error::ErrorKind::StorageWrite,
                    format!(
                        "'{}' was removed from the index but its object could not \
                         be deleted; a later cleanup or retry is required",
                        entry.name
                    ),
                    e,
                )
                .flag_storage_orphan()
            })?;
        }

        info!(
            user_id = %ctx.user_id,
            scope = %ctx.scope,
            path = %path,
            "File deleted"
        );

        Ok(())
    }
}

fn report(progress: &Option<ProgressCallback>, file_name: &str, transferred: u64, total: u64) {
    if let Some(cb) = progress {
        cb(UploadProgress {
            file_name: file_name.to_string(),
            transferred,
            total,
        });
    }
}
