//! Local filesystem object store.
//!
//! Flat object keys map onto nested files under a root directory. Two
//! conventions bridge the gap between flat keys and a real filesystem:
//! folder-marker keys (trailing slash) become a `.dv_folder` sentinel file
//! inside the directory, and content types are recorded in a `.dv_meta`
//! sidecar next to the data file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::traits::object_store::{ObjectMeta, ObjectPage, ObjectStore};

const FOLDER_SENTINEL: &str = ".dv_folder";
const META_SUFFIX: &str = ".dv_meta";

/// Sidecar metadata stored next to each data file.
#[derive(Debug, Serialize, Deserialize)]
struct SidecarMeta {
    content_type: Option<String>,
}

/// Local filesystem object store.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    /// Root directory for all stored objects.
    root: PathBuf,
    /// Maximum items per list page.
    page_size: usize,
}

impl LocalObjectStore {
    /// Create a new local store rooted at the given path.
    pub async fn new(root_path: &str, page_size: usize) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::StorageWrite,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            page_size: page_size.max(1),
        })
    }

    /// Resolve a flat key to an on-disk path.
    ///
    /// Marker keys (trailing slash) resolve to the folder sentinel file.
    fn resolve(&self, key: &str) -> PathBuf {
        let clean = key.trim_start_matches('/');
        if clean.ends_with('/') {
            self.root.join(clean).join(FOLDER_SENTINEL)
        } else {
            self.root.join(clean)
        }
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        let data = self.resolve(key);
        PathBuf::from(format!("{}{META_SUFFIX}", data.display()))
    }

    /// Map an on-disk path back to its flat key.
    fn key_of(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let mut key = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if key.ends_with(FOLDER_SENTINEL) {
            key.truncate(key.len() - FOLDER_SENTINEL.len());
        }
        Some(key)
    }

    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::StorageWrite,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    async fn read_sidecar(&self, key: &str) -> Option<String> {
        let raw = fs::read(self.meta_path(key)).await.ok()?;
        serde_json::from_slice::<SidecarMeta>(&raw)
            .ok()
            .and_then(|m| m.content_type)
    }

    /// Walk the tree under the prefix and return all keys, sorted.
    async fn keys_under(&self, prefix: &str) -> AppResult<Vec<String>> {
        let clean = prefix.trim_start_matches('/');
        let base = if clean.ends_with('/') || clean.is_empty() {
            self.root.join(clean)
        } else {
            self.root
                .join(clean)
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.root.clone())
        };

        let mut keys = Vec::new();
        let mut pending = vec![base];
        while let Some(dir) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(e) => e,
                // A prefix with no objects lists as empty.
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(AppError::with_source(
                        ErrorKind::StorageRead,
                        format!("Failed to read directory: {}", dir.display()),
                        e,
                    ));
                }
            };
            while let Some(entry) = entries.next_entry().await.map_err(|e| {
                AppError::with_source(ErrorKind::StorageRead, "Directory iteration failed", e)
            })? {
                let path = entry.path();
                let file_type = entry.file_type().await.map_err(|e| {
                    AppError::with_source(ErrorKind::StorageRead, "stat failed", e)
                })?;
                if file_type.is_dir() {
                    pending.push(path);
                } else if let Some(key) = self.key_of(&path) {
                    if key.ends_with(META_SUFFIX) {
                        continue;
                    }
                    if key.starts_with(clean) {
                        keys.push(key);
                    }
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.exists() && self.root.is_dir())
    }

    async fn put(&self, key: &str, data: Bytes, content_type: Option<&str>) -> AppResult<()> {
        let full_path = self.resolve(key);
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::StorageWrite,
                format!("Failed to write object: {key}"),
                e,
            )
        })?;

        if let Some(ct) = content_type {
            let meta = SidecarMeta {
                content_type: Some(ct.to_string()),
            };
            fs::write(self.meta_path(key), serde_json::to_vec(&meta)?)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::StorageWrite,
                        format!("Failed to write object metadata: {key}"),
                        e,
                    )
                })?;
        }

        debug!(key, bytes = data.len(), "Wrote object");
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(key);
        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::storage_read(format!("Object not found: {key}"))
            } else {
                AppError::with_source(
                    ErrorKind::StorageRead,
                    format!("Failed to read object: {key}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let full_path = self.resolve(key);
        match fs::remove_file(&full_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::StorageWrite,
                    format!("Failed to delete object: {key}"),
                    e,
                ));
            }
        }
        let _ = fs::remove_file(self.meta_path(key)).await;
        Ok(())
    }

    async fn list(&self, prefix: &str, page_token: Option<&str>) -> AppResult<ObjectPage> {
        let keys = self.keys_under(prefix).await?;

        let start = match page_token {
            Some(token) => keys.partition_point(|k| k.as_str() <= token),
            None => 0,
        };
        let page: Vec<String> = keys[start..]
            .iter()
            .take(self.page_size)
            .cloned()
            .collect();

        let next_page_token = if start + page.len() < keys.len() {
            page.last().cloned()
        } else {
            None
        };

        let mut items = Vec::with_capacity(page.len());
        for key in page {
            let path = self.resolve(&key);
            let size = fs::metadata(&path).await.map(|m| m.len()).unwrap_or(0);
            let content_type = self.read_sidecar(&key).await;
            items.push(ObjectMeta {
                key,
                size,
                content_type,
            });
        }

        Ok(ObjectPage {
            items,
            next_page_token,
        })
    }

    async fn sign(&self, key: &str, ttl: Duration) -> AppResult<String> {
        let full_path = self.resolve(key);
        if !full_path.exists() {
            return Err(AppError::storage_read(format!(
                "Cannot sign missing object: {key}"
            )));
        }
        let expires = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|d| chrono::Utc::now().checked_add_signed(d))
            .map(|t| t.timestamp())
            .unwrap_or(i64::MAX);
        Ok(format!(
            "file://{}?expires={expires}&token={}",
            full_path.display(),
            Uuid::new_v4()
        ))
    }
}
