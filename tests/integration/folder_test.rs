//! Folder create / rename / delete integration tests.

use std::sync::Arc;

use docvault::config::upload::UploadConfig;
use docvault::{
    EntryKind, ErrorKind, FileOperations, FolderOperations, MemoryMetadataIndex, ObjectStore,
    RenameMode, RequestContext, VirtualPath,
};
use uuid::Uuid;

use crate::helpers::{FailingIndex, FlakyStore, TestVault, upload_request};

#[tokio::test]
async fn test_create_folder_writes_marker_and_row() {
    let vault = TestVault::new();
    let folder = vault
        .folders
        .create(&vault.ctx, &VirtualPath::root(), "2025-Tax")
        .await
        .unwrap();

    assert_eq!(folder.kind, EntryKind::Folder);
    assert_eq!(folder.path().as_str(), "/2025-Tax");

    // Zero-byte marker at the storage hierarchy prefix.
    let marker = vault.ctx.scope.storage_key_prefix(&folder.path());
    assert!(marker.ends_with("/2025-Tax/"));
    assert!(vault.store.contains_key(&marker));

    let roots = vault.children("/").await;
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].name, "2025-Tax");
}

#[tokio::test]
async fn test_create_normalizes_messy_parent_path() {
    let vault = TestVault::new();
    let folder = vault
        .folders
        .create(&vault.ctx, &VirtualPath::normalize("//a/b//"), "c")
        .await
        .unwrap();
    assert_eq!(folder.path().as_str(), "/a/b/c");
}

#[tokio::test]
async fn test_create_rejects_bad_names() {
    let vault = TestVault::new();
    for name in ["", "   ", "a/b"] {
        let err = vault
            .folders
            .create(&vault.ctx, &VirtualPath::root(), name)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}

#[tokio::test]
async fn test_create_index_failure_is_flagged_as_orphan() {
    let store = Arc::new(FlakyStore::new(100));
    let folders = FolderOperations::new(store.clone(), Arc::new(FailingIndex));
    let ctx = RequestContext::for_own_vault(Uuid::new_v4());

    let err = folders
        .create(&ctx, &VirtualPath::root(), "2025-Tax")
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::IndexWrite);
    assert!(err.storage_orphan);
    assert!(!err.is_retry_safe());
    // Phase 1 succeeded: the marker is there with no matching row.
    let marker = ctx
        .scope
        .storage_key_prefix(&VirtualPath::normalize("/2025-Tax"));
    assert!(store.contains_key(&marker));
}

#[tokio::test]
async fn test_create_storage_failure_leaves_nothing_behind() {
    let mut flaky = FlakyStore::new(100);
    flaky.fail_put_containing = Some("2025-Tax".to_string());
    let store = Arc::new(flaky);
    let index = Arc::new(MemoryMetadataIndex::new());
    let folders = FolderOperations::new(store.clone(), index.clone());
    let ctx = RequestContext::for_own_vault(Uuid::new_v4());

    let err = folders
        .create(&ctx, &VirtualPath::root(), "2025-Tax")
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::StorageWrite);
    assert!(err.is_retry_safe());
    assert_eq!(index.row_count(&ctx.scope), 0);
}

async fn rename_scenario(mode: RenameMode, page_size: usize) {
    let vault = TestVault::with_page_size(page_size);
    let folder = vault
        .folders
        .create(&vault.ctx, &VirtualPath::root(), "2025-Tax")
        .await
        .unwrap();

    let parent = VirtualPath::normalize("/2025-Tax");
    let mut uploaded_ids = Vec::new();
    for name in ["a.pdf", "b.pdf", "c.pdf"] {
        let entry = vault
            .files
            .upload(
                &vault.ctx,
                &parent,
                upload_request(name, "application/pdf", b"doc"),
                None,
            )
            .await
            .unwrap();
        uploaded_ids.push(entry.id);
    }

    let renamed = vault
        .folders
        .rename(&vault.ctx, &folder, "2025-Taxes", mode)
        .await
        .unwrap();

    // Rename never mutates id or kind.
    assert_eq!(renamed.id, folder.id);
    assert_eq!(renamed.kind, EntryKind::Folder);
    assert_eq!(renamed.path().as_str(), "/2025-Taxes");

    // Same three entries by id under the new path; old path is empty.
    let new_children = vault.children("/2025-Taxes").await;
    let mut new_ids: Vec<Uuid> = new_children.iter().map(|e| e.id).collect();
    new_ids.sort();
    uploaded_ids.sort();
    assert_eq!(new_ids, uploaded_ids);
    assert!(vault.children("/2025-Tax").await.is_empty());

    // Storage relocated: nothing under the old prefix, marker + files under
    // the new one.
    let old_prefix = vault
        .ctx
        .scope
        .storage_key_prefix(&VirtualPath::normalize("/2025-Tax"));
    let new_prefix = vault
        .ctx
        .scope
        .storage_key_prefix(&VirtualPath::normalize("/2025-Taxes"));
    let old_page = vault.store.list(&old_prefix, None).await.unwrap();
    assert!(old_page.items.is_empty());
    assert!(vault.store.contains_key(&new_prefix));
    for child in &new_children {
        let key = child.storage_key.as_deref().unwrap();
        assert!(key.starts_with(&new_prefix));
        assert!(vault.store.contains_key(key));
    }
}

#[tokio::test]
async fn test_rename_sequential_relocates_three_files() {
    rename_scenario(RenameMode::Sequential, 100).await;
}

#[tokio::test]
async fn test_rename_batched_relocates_three_files() {
    rename_scenario(RenameMode::Batched, 100).await;
}

#[tokio::test]
async fn test_rename_pages_through_large_listings() {
    // Page size 2 with 3 files + marker forces multiple list pages.
    rename_scenario(RenameMode::Sequential, 2).await;
}

#[tokio::test]
async fn test_rename_copy_failure_reports_partial_and_keeps_old_objects() {
    let mut flaky = FlakyStore::new(100);
    // Copies into the new prefix fail for one of the files.
    flaky.fail_put_containing = Some("Renamed/b.pdf".to_string());
    let store = Arc::new(flaky);
    let index = Arc::new(MemoryMetadataIndex::new());
    let folders = FolderOperations::new(store.clone(), index.clone());
    let files = FileOperations::new(store.clone(), index.clone(), UploadConfig::default());
    let ctx = RequestContext::for_own_vault(Uuid::new_v4());

    let folder = folders
        .create(&ctx, &VirtualPath::root(), "Docs")
        .await
        .unwrap();
    let parent = VirtualPath::normalize("/Docs");
    for name in ["a.pdf", "b.pdf", "c.pdf"] {
        files
            .upload(&ctx, &parent, upload_request(name, "application/pdf", b"doc"), None)
            .await
            .unwrap();
    }

    let err = folders
        .rename(&ctx, &folder, "Renamed", RenameMode::Batched)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::PartialRename);

    // Deletes were never issued: every old object is still present.
    for name in ["a.pdf", "b.pdf", "c.pdf"] {
        let key = ctx.scope.storage_key_for_file(&parent, name);
        assert!(store.contains_key(&key), "old object missing: {key}");
    }
    // The index still lists the old path.
    assert_eq!(index.row_count(&ctx.scope), 4);
}

#[tokio::test]
async fn test_rename_rejects_workflow_owned_folder() {
    let vault = TestVault::new();
    let mut folder = vault
        .folders
        .create(&vault.ctx, &VirtualPath::root(), "Requested")
        .await
        .unwrap();
    folder.linked_request_id = Some(Uuid::new_v4());

    let err = vault
        .folders
        .rename(&vault.ctx, &folder, "Other", RenameMode::Sequential)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_delete_removes_rows_then_objects() {
    let vault = TestVault::new();
    let folder = vault
        .folders
        .create(&vault.ctx, &VirtualPath::root(), "Old")
        .await
        .unwrap();
    let parent = VirtualPath::normalize("/Old");
    vault
        .files
        .upload(
            &vault.ctx,
            &parent,
            upload_request("x.pdf", "application/pdf", b"doc"),
            None,
        )
        .await
        .unwrap();

    vault.folders.delete(&vault.ctx, &folder).await.unwrap();

    assert!(vault.children("/").await.is_empty());
    assert_eq!(vault.store.object_count(), 0);

    // A second delete finds nothing: the entry vanished first.
    let err = vault.folders.delete(&vault.ctx, &folder).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_hides_folder_even_when_object_removal_fails() {
    let mut flaky = FlakyStore::new(100);
    flaky.fail_all_deletes = true;
    let store = Arc::new(flaky);
    let index = Arc::new(MemoryMetadataIndex::new());
    let folders = FolderOperations::new(store.clone(), index.clone());
    let ctx = RequestContext::for_own_vault(Uuid::new_v4());

    let folder = folders
        .create(&ctx, &VirtualPath::root(), "Stuck")
        .await
        .unwrap();

    let err = folders.delete(&ctx, &folder).await.unwrap_err();
    assert!(err.storage_orphan);

    // Index-first ordering: the folder is gone from listings immediately,
    // even though its objects are still in storage.
    assert_eq!(index.row_count(&ctx.scope), 0);
    let marker = ctx.scope.storage_key_prefix(&folder.path());
    assert!(store.contains_key(&marker));
}

#[tokio::test]
async fn test_scenario_folder_with_file_listing() {
    let vault = TestVault::new();
    vault
        .folders
        .create(&vault.ctx, &VirtualPath::root(), "2025-Tax")
        .await
        .unwrap();
    vault
        .files
        .upload(
            &vault.ctx,
            &VirtualPath::normalize("/2025-Tax"),
            upload_request("invoice.pdf", "application/pdf", b"pdf"),
            None,
        )
        .await
        .unwrap();

    let inside = vault.children("/2025-Tax").await;
    assert_eq!(inside.len(), 1);
    assert_eq!(inside[0].name, "invoice.pdf");
    assert_eq!(inside[0].kind, EntryKind::File);

    let roots = vault.children("/").await;
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].name, "2025-Tax");
    assert_eq!(roots[0].kind, EntryKind::Folder);
    assert_eq!(roots[0].child_count, Some(1));
}
