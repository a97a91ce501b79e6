//! Entry-name validation shared by folder and file operations.

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_entity::FileSystemEntry;

/// Validate a user-supplied entry name.
///
/// Names become single path segments, so separators are rejected rather
/// than silently creating extra hierarchy levels.
pub(crate) fn entry_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Name cannot be empty"));
    }
    if name.contains('/') {
        return Err(AppError::validation("Name cannot contain '/'"));
    }
    Ok(())
}

/// Reject operations on entries owned by a document-request workflow.
pub(crate) fn not_workflow_owned(entry: &FileSystemEntry) -> AppResult<()> {
    if entry.is_read_only() {
        return Err(AppError::validation(format!(
            "'{}' is managed by a document request and cannot be modified here",
            entry.name
        )));
    }
    Ok(())
}
