//! Integration test suite for the DocVault virtual filesystem layer.

mod helpers;

mod folder_test;
mod url_cache_test;
