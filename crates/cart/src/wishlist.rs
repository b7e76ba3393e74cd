//! Wishlist.
//!
//! One entry per product; color and size are chosen when the product is
//! moved into the cart.

use std::sync::Arc;

use cartwheel_core::{Amount, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::line_item::CartProduct;
use crate::notice::{Notice, NoticeSink};
use crate::repository::Repository;
use crate::storage::KeyValueStore;
use crate::store::CartStore;

/// A saved product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub product_id: ProductId,
    pub name: String,
    #[serde(rename = "price")]
    pub unit_price: Amount,
    #[serde(
        rename = "originalPrice",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub original_unit_price: Option<Amount>,
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

impl WishlistItem {
    /// Create an entry stamped with the current time.
    #[must_use]
    pub fn new(product_id: ProductId, name: impl Into<String>, unit_price: Amount) -> Self {
        Self {
            product_id,
            name: name.into(),
            unit_price,
            original_unit_price: None,
            added_at: Utc::now(),
        }
    }

    #[must_use]
    pub const fn with_original_price(mut self, original: Amount) -> Self {
        self.original_unit_price = Some(original);
        self
    }
}

/// Persisted wishlist.
pub struct WishlistStore<S: KeyValueStore> {
    items: Vec<WishlistItem>,
    repo: Repository<S>,
    sink: Arc<dyn NoticeSink>,
}

impl<S: KeyValueStore> std::fmt::Debug for WishlistStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WishlistStore")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore> WishlistStore<S> {
    /// Open the wishlist persisted in `store`. Unreadable data loads as empty.
    pub fn open(store: S, sink: Arc<dyn NoticeSink>) -> Self {
        let repo = Repository::new(store);
        let items = repo.load_wishlist();
        debug!(items = items.len(), "loaded wishlist");
        Self { items, repo, sink }
    }

    #[must_use]
    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&WishlistItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    /// Save a product. Returns `false` if it was already saved.
    #[instrument(skip(self, item), fields(product_id = %item.product_id))]
    pub fn add(&mut self, item: WishlistItem) -> bool {
        if self.contains(item.product_id) {
            return false;
        }

        self.sink
            .notify(Notice::success(format!("{} added to your wishlist", item.name)));
        self.items.push(item);
        self.persist();
        true
    }

    /// Remove a product. Returns the removed entry.
    #[instrument(skip(self))]
    pub fn remove(&mut self, product_id: ProductId) -> Option<WishlistItem> {
        let index = self
            .items
            .iter()
            .position(|item| item.product_id == product_id)?;
        let removed = self.items.remove(index);

        self.sink
            .notify(Notice::info(format!("{} removed from your wishlist", removed.name)));
        self.persist();
        Some(removed)
    }

    /// Add the product if absent, remove it if present. Returns whether the
    /// product is saved afterwards.
    pub fn toggle(&mut self, item: WishlistItem) -> bool {
        if self.remove(item.product_id).is_some() {
            false
        } else {
            self.add(item)
        }
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Put one unit of a saved product into `cart` and take it off the
    /// wishlist. Returns `false` if the product is not saved.
    #[instrument(skip(self, cart))]
    pub fn move_to_cart<C: KeyValueStore>(
        &mut self,
        product_id: ProductId,
        color: &str,
        size: &str,
        cart: &mut CartStore<C>,
    ) -> bool {
        let Some(item) = self.remove(product_id) else {
            return false;
        };

        cart.add_item(
            CartProduct {
                product_id: item.product_id,
                name: item.name,
                color: color.to_owned(),
                size: size.to_owned(),
                unit_price: item.unit_price,
                original_unit_price: item.original_unit_price,
            },
            1,
        );
        true
    }

    fn persist(&self) {
        if let Err(e) = self.repo.save_wishlist(&self.items) {
            error!(error = %e, "failed to persist wishlist");
        }
    }
}
