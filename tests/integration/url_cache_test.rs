//! Signed-URL cache behavior across file operations.

use docvault::config::cache::CacheConfig;
use docvault::{SignedUrlCache, VirtualPath};

use crate::helpers::{TestVault, upload_request};

#[tokio::test]
async fn test_rename_then_invalidate_yields_url_for_new_key() {
    let vault = TestVault::new();
    let cache = SignedUrlCache::new(vault.store.clone(), &CacheConfig::default());

    let entry = vault
        .files
        .upload(
            &vault.ctx,
            &VirtualPath::root(),
            upload_request("draft.pdf", "application/pdf", b"pdf"),
            None,
        )
        .await
        .unwrap();

    let url = cache.resolve(&entry).await.unwrap();
    assert!(url.contains("draft.pdf"));

    let renamed = vault
        .files
        .rename(&vault.ctx, &entry, "final.pdf")
        .await
        .unwrap();
    cache.invalidate(entry.id).await;

    // Same entry id, but the URL now points at the relocated object.
    let url = cache.resolve(&renamed).await.unwrap();
    assert!(url.contains("final.pdf"));
    assert!(!url.contains("draft.pdf"));
}

#[tokio::test]
async fn test_stale_url_served_until_invalidated() {
    let vault = TestVault::new();
    let cache = SignedUrlCache::new(vault.store.clone(), &CacheConfig::default());

    let entry = vault
        .files
        .upload(
            &vault.ctx,
            &VirtualPath::root(),
            upload_request("draft.pdf", "application/pdf", b"pdf"),
            None,
        )
        .await
        .unwrap();
    let first = cache.resolve(&entry).await.unwrap();

    // Without invalidation the cache keeps handing out the cached URL,
    // even for an entry whose key has changed.
    let renamed = vault
        .files
        .rename(&vault.ctx, &entry, "final.pdf")
        .await
        .unwrap();
    let cached = cache.resolve(&renamed).await.unwrap();
    assert_eq!(cached, first);

    cache.invalidate_all();
    let fresh = cache.resolve(&renamed).await.unwrap();
    assert!(fresh.contains("final.pdf"));
}
