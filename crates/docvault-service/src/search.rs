//! Debounced, scope-wide name search over the metadata index.
//!
//! The engine queries the index, never the object store, and deliberately
//! ignores the current folder: a match anywhere in the vault is returned.
//! Calls are debounced, and only the latest call's result is applied —
//! superseded calls come back as `None` and must be discarded, which is an
//! ordering guarantee rather than a race-avoidance nicety.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::debug;

use docvault_core::config::search::SearchConfig;
use docvault_core::result::AppResult;
use docvault_core::types::VirtualPath;
use docvault_entity::FileSystemEntry;
use docvault_index::MetadataIndex;

use crate::context::RequestContext;
use crate::resolver::EntryResolver;

/// Debounced search over a vault's index rows.
pub struct SearchEngine {
    /// Metadata index boundary.
    index: Arc<dyn MetadataIndex>,
    /// Debounce window of caller inactivity.
    debounce: Duration,
    /// Monotonic call counter; only the call holding the latest value may
    /// deliver a result.
    generation: AtomicU64,
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("debounce", &self.debounce)
            .finish()
    }
}

impl SearchEngine {
    /// Creates a new search engine.
    pub fn new(index: Arc<dyn MetadataIndex>, config: &SearchConfig) -> Self {
        Self {
            index,
            debounce: Duration::from_millis(config.debounce_ms),
            generation: AtomicU64::new(0),
        }
    }

    /// Search the vault for entries whose name contains `query`
    /// (case-insensitive), across all paths.
    ///
    /// Returns `Ok(None)` when a newer call superseded this one during the
    /// debounce window or while the index query was in flight; the caller
    /// must drop such results. An empty or blank query short-circuits to
    /// the normal folder-scoped listing of `current_path`.
    pub async fn search(
        &self,
        ctx: &RequestContext,
        current_path: &VirtualPath,
        query: &str,
    ) -> AppResult<Option<Vec<FileSystemEntry>>> {
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.debounce).await;
        if self.generation.load(Ordering::SeqCst) != my_generation {
            debug!(query, "Search superseded during debounce");
            return Ok(None);
        }

        let query = query.trim();
        let entries = if query.is_empty() {
            self.index
                .query_by_parent_path(&ctx.scope, current_path)
                .await?
        } else {
            self.index
                .query_by_name_substring(&ctx.scope, query)
                .await?
        };

        // A newer call may have started while the query was in flight;
        // stale responses are discarded, not reordered.
        if self.generation.load(Ordering::SeqCst) != my_generation {
            debug!(query, "Search superseded in flight");
            return Ok(None);
        }

        Ok(Some(EntryResolver::sort_children(entries)))
    }
}
