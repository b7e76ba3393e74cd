//! CLI command implementations.

pub mod cart;
pub mod promo;
pub mod wishlist;

use std::sync::Arc;

use cartwheel_cart::{
    CartConfig, CartStore, FileStore, NoticeLog, PromoError, StorageError, WishlistStore,
};
use cartwheel_core::{NoticeLevel, ProductId};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The data directory could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A promo code was rejected.
    #[error("{0}")]
    Promo(#[from] PromoError),

    /// No line item matches the given product and variant.
    #[error("No cart item for product {product_id} ({color}, {size})")]
    ItemNotFound {
        product_id: ProductId,
        color: String,
        size: String,
    },

    /// The product is not on the wishlist.
    #[error("Product {0} is not on the wishlist")]
    NotSaved(ProductId),

    /// Output could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Cart and wishlist opened over the configured data directory.
pub struct Session {
    pub cart: CartStore<FileStore>,
    pub wishlist: WishlistStore<FileStore>,
    notices: Arc<NoticeLog>,
}

impl Session {
    /// Open both stores over the configured data directory.
    pub fn open(config: &CartConfig) -> Result<Self, CommandError> {
        let store = FileStore::open(&config.data_dir)?;
        tracing::debug!(data_dir = %config.data_dir.display(), "opened data directory");

        let notices = Arc::new(NoticeLog::new());
        let cart = CartStore::from_config(store.clone(), notices.clone(), config);
        let wishlist = WishlistStore::open(store, notices.clone());

        Ok(Self {
            cart,
            wishlist,
            notices,
        })
    }

    /// Wait for pending follow-up notices, then print everything raised.
    pub async fn finish(&mut self) {
        self.cart.settle().await;
        print_notices(&self.notices);
    }
}

#[allow(clippy::print_stdout)] // CLI output
fn print_notices(notices: &NoticeLog) {
    for notice in notices.drain() {
        let marker = match notice.level {
            NoticeLevel::Error => "✗",
            NoticeLevel::Warning => "!",
            NoticeLevel::Info => "·",
            NoticeLevel::Success => "✓",
        };
        println!("{marker} {}", notice.message);
    }
}
