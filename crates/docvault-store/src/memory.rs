//! In-memory object store backed by dashmap.
//!
//! The flat key namespace is held in a concurrent map; prefix listings are
//! served from a sorted snapshot with bounded pages, matching the paging
//! contract of remote blob stores.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use docvault_core::result::AppResult;
use docvault_core::traits::object_store::{ObjectMeta, ObjectPage, ObjectStore};

/// A stored object: content bytes plus recorded content type.
#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    content_type: Option<String>,
}

/// In-memory object store.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: DashMap<String, StoredObject>,
    page_size: usize,
}

impl MemoryObjectStore {
    /// Create a new empty store with the given list page size.
    pub fn new(page_size: usize) -> Self {
        Self {
            objects: DashMap::new(),
            page_size: page_size.max(1),
        }
    }

    /// Number of stored objects. Test/diagnostic helper.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Whether an object exists at the given key. Test/diagnostic helper.
    pub fn contains_key(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    /// Sorted snapshot of keys under a prefix.
    fn keys_under(&self, prefix: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn put(&self, key: &str, data: Bytes, content_type: Option<&str>) -> AppResult<()> {
        debug!(key, bytes = data.len(), "Stored object");
        self.objects.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.map(str::to_string),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Bytes> {
        self.objects
            .get(key)
            .map(|obj| obj.data.clone())
            .ok_or_else(|| {
                docvault_core::AppError::storage_read(format!("Object not found: {key}"))
            })
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.objects.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str, page_token: Option<&str>) -> AppResult<ObjectPage> {
        let keys = self.keys_under(prefix);

        // The token is the last key of the previous page; resume after it.
        let start = match page_token {
            Some(token) => keys.partition_point(|k| k.as_str() <= token),
            None => 0,
        };
        let page: Vec<&String> = keys[start..].iter().take(self.page_size).collect();

        let next_page_token = if start + page.len() < keys.len() {
            page.last().map(|k| (*k).clone())
        } else {
            None
        };

        let items = page
            .into_iter()
            .filter_map(|key| {
                self.objects.get(key).map(|obj| ObjectMeta {
                    key: key.clone(),
                    size: obj.data.len() as u64,
                    content_type: obj.content_type.clone(),
                })
            })
            .collect();

        Ok(ObjectPage {
            items,
            next_page_token,
        })
    }

    async fn sign(&self, key: &str, ttl: Duration) -> AppResult<String> {
        if !self.objects.contains_key(key) {
            return Err(docvault_core::AppError::storage_read(format!(
                "Cannot sign missing object: {key}"
            )));
        }
        let expires = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|d| chrono::Utc::now().checked_add_signed(d))
            .map(|t| t.timestamp())
            .unwrap_or(i64::MAX);
        Ok(format!(
            "memory://{key}?expires={expires}&token={}",
            Uuid::new_v4()
        ))
    }
}
