//! Integration tests for Cartwheel.
//!
//! These tests drive the cart engine against a real data directory, so they
//! exercise the JSON documents as they are written to disk.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cartwheel-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;
use std::sync::Arc;

use cartwheel_cart::{CartProduct, CartStore, FileStore, NoticeLog, WishlistStore};
use cartwheel_core::{Amount, ProductId};
use tempfile::TempDir;

/// A throwaway data directory shared by every store a test opens.
///
/// Opening a store twice over the same context simulates a new session.
pub struct TestContext {
    dir: TempDir,
    pub notices: Arc<NoticeLog>,
}

impl TestContext {
    /// Create an empty data directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
            notices: Arc::new(NoticeLog::new()),
        }
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Open a file store over the data directory.
    ///
    /// # Panics
    ///
    /// Panics if the directory cannot be opened.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn store(&self) -> FileStore {
        FileStore::open(self.dir.path()).expect("failed to open file store")
    }

    #[must_use]
    pub fn open_cart(&self) -> CartStore<FileStore> {
        CartStore::open(self.store(), self.notices.clone())
    }

    #[must_use]
    pub fn open_wishlist(&self) -> WishlistStore<FileStore> {
        WishlistStore::open(self.store(), self.notices.clone())
    }

    /// Overwrite the raw document stored under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    #[allow(clippy::expect_used)]
    pub fn write_raw(&self, key: &str, contents: &str) {
        std::fs::write(self.dir.path().join(format!("{key}.json")), contents)
            .expect("failed to write raw document");
    }

    /// Read the raw document stored under `key`, if any.
    #[must_use]
    pub fn read_raw(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.dir.path().join(format!("{key}.json"))).ok()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A product in the given variant.
#[must_use]
pub fn product(id: i32, color: &str, size: &str, price: i64) -> CartProduct {
    CartProduct {
        product_id: ProductId::new(id),
        name: format!("Product {id}"),
        color: color.to_string(),
        size: size.to_string(),
        unit_price: Amount::from_units(price),
        original_unit_price: None,
    }
}
