//! Shared test helpers for integration tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use docvault::config::upload::UploadConfig;
use docvault::{
    AppResult, EntryResolver, FileOperations, FileSystemEntry, FolderOperations,
    MemoryMetadataIndex, MemoryObjectStore, ObjectPage, ObjectStore, RequestContext, UploadRequest,
    VirtualPath,
};

/// A fully wired in-memory vault for one test user.
pub struct TestVault {
    /// The underlying object store, for direct assertions on keys.
    pub store: Arc<MemoryObjectStore>,
    /// The underlying index, for direct assertions on rows.
    pub index: Arc<MemoryMetadataIndex>,
    /// Folder operations under test.
    pub folders: FolderOperations,
    /// File operations under test.
    pub files: FileOperations,
    /// Request context for the vault owner.
    pub ctx: RequestContext,
}

impl TestVault {
    /// Create a vault with the default list page size.
    pub fn new() -> Self {
        Self::with_page_size(100)
    }

    /// Create a vault whose object store pages listings at `page_size`.
    pub fn with_page_size(page_size: usize) -> Self {
        let store = Arc::new(MemoryObjectStore::new(page_size));
        let index = Arc::new(MemoryMetadataIndex::new());
        let folders = FolderOperations::new(store.clone(), index.clone());
        let files = FileOperations::new(store.clone(), index.clone(), UploadConfig::default());
        let ctx = RequestContext::for_own_vault(Uuid::new_v4());
        Self {
            store,
            index,
            folders,
            files,
            ctx,
        }
    }

    /// List the children of a path, in listing order.
    pub async fn children(&self, path: &str) -> Vec<FileSystemEntry> {
        EntryResolver::children(
            self.index.as_ref(),
            &self.ctx.scope,
            &VirtualPath::normalize(path),
        )
        .await
        .expect("listing failed")
    }
}

/// Build an upload request from static content.
pub fn upload_request(name: &str, mime: &str, data: &'static [u8]) -> UploadRequest {
    UploadRequest {
        file_name: name.to_string(),
        mime_type: Some(mime.to_string()),
        data: Bytes::from_static(data),
        linked_request_id: None,
    }
}

/// An object store wrapper that fails selected operations, for exercising
/// phase-specific error handling.
#[derive(Debug)]
pub struct FlakyStore {
    inner: MemoryObjectStore,
    /// `put` fails for keys containing this fragment.
    pub fail_put_containing: Option<String>,
    /// `delete` fails for all keys when set.
    pub fail_all_deletes: bool,
}

impl FlakyStore {
    pub fn new(page_size: usize) -> Self {
        Self {
            inner: MemoryObjectStore::new(page_size),
            fail_put_containing: None,
            fail_all_deletes: false,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }
}

#[async_trait]
impl ObjectStore for FlakyStore {
    fn provider_type(&self) -> &str {
        "flaky"
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }

    async fn put(&self, key: &str, data: Bytes, content_type: Option<&str>) -> AppResult<()> {
        if let Some(fragment) = &self.fail_put_containing {
            if key.contains(fragment.as_str()) {
                return Err(docvault::AppError::storage_write(format!(
                    "injected put failure: {key}"
                )));
            }
        }
        self.inner.put(key, data, content_type).await
    }

    async fn get(&self, key: &str) -> AppResult<Bytes> {
        self.inner.get(key).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        if self.fail_all_deletes {
            return Err(docvault::AppError::storage_write(format!(
                "injected delete failure: {key}"
            )));
        }
        self.inner.delete(key).await
    }

    async fn list(&self, prefix: &str, page_token: Option<&str>) -> AppResult<ObjectPage> {
        self.inner.list(prefix, page_token).await
    }

    async fn sign(&self, key: &str, ttl: Duration) -> AppResult<String> {
        self.inner.sign(key, ttl).await
    }
}

/// A metadata index wrapper whose writes always fail, for exercising the
/// orphan-flagged phase-2 error path.
#[derive(Debug)]
pub struct FailingIndex;

#[async_trait]
impl docvault::MetadataIndex for FailingIndex {
    async fn upsert(
        &self,
        _scope: &docvault::UserScope,
        _entry: &FileSystemEntry,
    ) -> AppResult<()> {
        Err(docvault::AppError::index_write("injected upsert failure"))
    }

    async fn update(
        &self,
        _scope: &docvault::UserScope,
        _id: Uuid,
        _patch: docvault::EntryPatch,
    ) -> AppResult<FileSystemEntry> {
        Err(docvault::AppError::index_write("injected update failure"))
    }

    async fn delete_by_path(
        &self,
        _scope: &docvault::UserScope,
        _path: &VirtualPath,
    ) -> AppResult<u64> {
        Err(docvault::AppError::index_write("injected delete failure"))
    }

    async fn find_by_id(
        &self,
        _scope: &docvault::UserScope,
        _id: Uuid,
    ) -> AppResult<Option<FileSystemEntry>> {
        Ok(None)
    }

    async fn find_by_path(
        &self,
        _scope: &docvault::UserScope,
        _path: &VirtualPath,
    ) -> AppResult<Option<FileSystemEntry>> {
        Ok(None)
    }

    async fn query_by_parent_path(
        &self,
        _scope: &docvault::UserScope,
        _parent: &VirtualPath,
    ) -> AppResult<Vec<FileSystemEntry>> {
        Ok(Vec::new())
    }

    async fn query_by_name_substring(
        &self,
        _scope: &docvault::UserScope,
        _text: &str,
    ) -> AppResult<Vec<FileSystemEntry>> {
        Ok(Vec::new())
    }

    async fn update_paths(
        &self,
        _scope: &docvault::UserScope,
        _old_path: &VirtualPath,
        _new_path: &VirtualPath,
    ) -> AppResult<u64> {
        Err(docvault::AppError::index_write("injected rewrite failure"))
    }
}
