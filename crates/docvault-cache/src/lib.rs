//! # docvault-cache
//!
//! Per-entry cache of presigned URLs with in-flight request coalescing and
//! an explicit invalidation contract.

pub mod signed_url;

pub use signed_url::SignedUrlCache;
