//! Object store trait for pluggable flat-namespace blob backends.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Metadata about a stored object.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ObjectMeta {
    /// Flat object key.
    pub key: String,
    /// Size in bytes.
    pub size: u64,
    /// Content type recorded at write time (if any).
    pub content_type: Option<String>,
}

/// One page of a prefix listing.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ObjectPage {
    /// Objects in this page.
    pub items: Vec<ObjectMeta>,
    /// Token for the next page; `None` when the listing is exhausted.
    pub next_page_token: Option<String>,
}

/// Trait for flat-namespace object storage backends.
///
/// Keys are opaque flat strings; hierarchy is purely a key-prefix
/// convention. There is deliberately **no** move/rename primitive — the
/// backing services offer none, which is why folder renames upstream are
/// explicit copy+delete loops.
///
/// Errors from mutating operations carry `ErrorKind::StorageWrite`, reads
/// carry `ErrorKind::StorageRead`, so callers can phase-tag failures.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "memory", "local").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write an object at the given key, overwriting any existing object.
    async fn put(&self, key: &str, data: Bytes, content_type: Option<&str>) -> AppResult<()>;

    /// Read an object's full contents.
    async fn get(&self, key: &str) -> AppResult<Bytes>;

    /// Delete the object at the given key. Deleting a missing key is a no-op.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// List objects under a key prefix, one bounded page at a time.
    ///
    /// Pass the previous page's `next_page_token` to continue; callers must
    /// page until exhausted.
    async fn list(&self, prefix: &str, page_token: Option<&str>) -> AppResult<ObjectPage>;

    /// Generate a time-limited signed URL for direct access to an object.
    async fn sign(&self, key: &str, ttl: Duration) -> AppResult<String>;
}
