//! Cartwheel Cart - Cart, wishlist and promo-code engine.
//!
//! This crate holds the storefront's cart logic, independent of any UI:
//! - [`CartStore`] - Line items, applied promo, used-codes ledger
//! - [`WishlistStore`] - Saved products, with move-to-cart
//! - [`PromoCatalog`] - The promo codes the shop accepts
//! - [`CartTotals`] - Subtotal, shipping, discount and total, derived on read
//!
//! # Persistence
//!
//! Stores persist through a [`KeyValueStore`] on every mutation, one JSON
//! document per key (`cart`, `promoCode`, `usedPromoCodes`, `wishlist`).
//! Unreadable documents are logged and replaced by empty state.
//!
//! # Notices
//!
//! Outcomes shoppers should see (a promo applied, a code rejected) are sent
//! to an injected [`NoticeSink`]. Follow-up notices run as tokio tasks and are
//! cancelled when the owning store is dropped.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use cartwheel_cart::{CartProduct, CartStore, MemoryStore, TracingSink};
//! use cartwheel_core::{Amount, ProductId};
//!
//! let mut cart = CartStore::open(MemoryStore::new(), Arc::new(TracingSink));
//! cart.add_item(
//!     CartProduct {
//!         product_id: ProductId::new(1),
//!         name: "Linen shirt".to_string(),
//!         color: "white".to_string(),
//!         size: "M".to_string(),
//!         unit_price: Amount::from_units(600),
//!         original_unit_price: None,
//!     },
//!     1,
//! );
//!
//! assert!(cart.apply_code("save10").is_ok());
//! assert_eq!(cart.totals().total, Amount::from_units(600 + 100 - 60));
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod follow_up;
pub mod ledger;
pub mod line_item;
pub mod notice;
pub mod pricing;
pub mod promo;
pub mod repository;
pub mod storage;
pub mod store;
pub mod wishlist;

pub use catalog::{AppliedPromo, FREE_SHIPPING_CODE, PromoCatalog, PromoRule};
pub use config::{CartConfig, ConfigError};
pub use follow_up::{FollowUps, ScheduledNotice};
pub use ledger::UsedCodes;
pub use line_item::{CartProduct, DEFAULT_MAX_QUANTITY, LineItem, LineItemKey};
pub use notice::{Notice, NoticeLog, NoticeSink, TracingSink};
pub use pricing::{CartTotals, PricingPolicy};
pub use promo::PromoError;
pub use repository::{CartState, Repository, RepositoryError};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::CartStore;
pub use wishlist::{WishlistItem, WishlistStore};
