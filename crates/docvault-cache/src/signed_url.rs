//! Signed-URL cache using the moka crate.
//!
//! Cache key is the entry id. `try_get_with` coalesces concurrent lookups
//! for the same id onto a single sign request, which is the cache's core
//! contract: at most one in-flight request per entry at any time. moka is
//! internally synchronized, so one cache instance can serve concurrent
//! server callers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;
use uuid::Uuid;

use docvault_core::config::cache::CacheConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::object_store::ObjectStore;
use docvault_entity::FileSystemEntry;

/// Cache of presigned URLs, keyed by entry id.
///
/// URLs are never proactively refreshed: the cache TTL sits below the URL
/// TTL so a hit is always still valid, and a consumer holding an URL past
/// expiry re-resolves on its next access failure.
pub struct SignedUrlCache {
    store: Arc<dyn ObjectStore>,
    urls: Cache<Uuid, String>,
    url_ttl: Duration,
}

impl std::fmt::Debug for SignedUrlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedUrlCache")
            .field("url_ttl", &self.url_ttl)
            .finish()
    }
}

impl SignedUrlCache {
    /// Create a new cache over the given object store.
    pub fn new(store: Arc<dyn ObjectStore>, config: &CacheConfig) -> Self {
        // Entries must expire before the URLs they hold do.
        let entry_ttl = config.entry_ttl_seconds.min(config.url_ttl_seconds);
        let urls = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(entry_ttl))
            .build();

        Self {
            store,
            urls,
            url_ttl: Duration::from_secs(config.url_ttl_seconds),
        }
    }

    /// Resolve a time-limited access URL for a file or image entry.
    ///
    /// Concurrent callers for the same entry await one shared sign request
    /// rather than each issuing their own.
    pub async fn resolve(&self, entry: &FileSystemEntry) -> AppResult<String> {
        let key = entry
            .storage_key
            .clone()
            .ok_or_else(|| AppError::validation("Folders have no signed URL"))?;

        let store = Arc::clone(&self.store);
        let ttl = self.url_ttl;
        self.urls
            .try_get_with(entry.id, async move { store.sign(&key, ttl).await })
            .await
            .map_err(|e: Arc<AppError>| (*e).clone())
    }

    /// Evict the cached URL for an entry.
    ///
    /// Must be called when the entry is renamed (its storage key changed,
    /// so the old URL no longer resolves) or removed from view.
    pub async fn invalidate(&self, id: Uuid) {
        self.urls.invalidate(&id).await;
        debug!(entry_id = %id, "Evicted signed URL");
    }

    /// Evict every cached URL.
    pub fn invalidate_all(&self) {
        self.urls.invalidate_all();
    }
}
