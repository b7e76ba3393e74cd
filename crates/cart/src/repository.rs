//! Persistence of cart and wishlist state.
//!
//! # Keys
//!
//! - `cart` - Array of line items
//! - `promoCode` - The applied promo (absent when none)
//! - `usedPromoCodes` - Array of redeemed single-use codes
//! - `wishlist` - Array of wishlist items
//!
//! Every key is decoded independently. A document that fails to parse is
//! logged and treated as absent, so one corrupt key never costs the others
//! and never blocks startup. Array documents are decoded entry by entry, so
//! a single bad line item is dropped without losing the rest of the cart.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::AppliedPromo;
use crate::ledger::UsedCodes;
use crate::line_item::LineItem;
use crate::storage::{KeyValueStore, StorageError};
use crate::wishlist::WishlistItem;

pub const CART_KEY: &str = "cart";
pub const PROMO_CODE_KEY: &str = "promoCode";
pub const USED_PROMO_CODES_KEY: &str = "usedPromoCodes";
pub const WISHLIST_KEY: &str = "wishlist";

/// Errors at the repository boundary.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A stored document is not valid JSON for its key.
    #[error("failed to parse stored {key}: {source}")]
    Parse {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// State could not be encoded.
    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything the cart persists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    pub items: Vec<LineItem>,
    pub applied_promo: Option<AppliedPromo>,
    pub used_codes: UsedCodes,
}

/// Typed access to a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct Repository<S> {
    store: S,
}

impl<S: KeyValueStore> Repository<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Read and decode one key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the backend fails and
    /// `RepositoryError::Parse` if the document does not decode.
    pub fn read<T: DeserializeOwned>(&self, key: &'static str) -> Result<Option<T>, RepositoryError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| RepositoryError::Parse { key, source })
    }

    /// Encode and write one key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if encoding or the backend fails.
    pub fn write<T: Serialize>(&self, key: &'static str, value: &T) -> Result<(), RepositoryError> {
        let raw = serde_json::to_string(value)
            .map_err(|source| RepositoryError::Serialize { key, source })?;
        self.store.set(key, &raw)?;
        Ok(())
    }

    /// Delete one key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the backend fails.
    pub fn delete(&self, key: &'static str) -> Result<(), RepositoryError> {
        self.store.remove(key)?;
        Ok(())
    }

    /// Read a key, falling back to `None` on any failure.
    fn read_or_default<T: DeserializeOwned>(&self, key: &'static str) -> Option<T> {
        match self.read(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "discarding unreadable stored state");
                None
            }
        }
    }

    /// Read an array key, keeping the entries that decode.
    fn read_entries<T: DeserializeOwned>(&self, key: &'static str) -> Vec<T> {
        let Some(entries) = self.read_or_default::<Vec<serde_json::Value>>(key) else {
            return Vec::new();
        };

        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(key, index, error = %e, "discarding unreadable stored entry");
                    None
                }
            })
            .collect()
    }

    /// Load cart state, defaulting each key that is missing or unreadable.
    pub fn load_cart(&self) -> CartState {
        let mut items: Vec<LineItem> = self.read_entries(CART_KEY);
        for item in &mut items {
            item.sanitize();
        }
        merge_duplicate_items(&mut items);

        let mut used_codes: UsedCodes = self.read_or_default(USED_PROMO_CODES_KEY).unwrap_or_default();
        used_codes.dedup();

        let state = CartState {
            items,
            applied_promo: self.read_or_default(PROMO_CODE_KEY),
            used_codes,
        };

        debug!(
            items = state.items.len(),
            promo = state.applied_promo.as_ref().map(|p| p.code.as_str()),
            used_codes = state.used_codes.len(),
            "loaded cart state"
        );
        state
    }

    /// Persist cart state.
    ///
    /// # Errors
    ///
    /// Returns the first `RepositoryError` encountered; later keys are not
    /// written in that case.
    pub fn save_cart(&self, state: &CartState) -> Result<(), RepositoryError> {
        self.write(CART_KEY, &state.items)?;
        match &state.applied_promo {
            Some(promo) => self.write(PROMO_CODE_KEY, promo)?,
            None => self.delete(PROMO_CODE_KEY)?,
        }
        self.write(USED_PROMO_CODES_KEY, &state.used_codes)
    }

    /// Load the wishlist, defaulting to empty if missing or unreadable.
    pub fn load_wishlist(&self) -> Vec<WishlistItem> {
        let mut items: Vec<WishlistItem> = self.read_entries(WISHLIST_KEY);
        let mut seen = Vec::with_capacity(items.len());
        items.retain(|item| {
            if seen.contains(&item.product_id) {
                false
            } else {
                seen.push(item.product_id);
                true
            }
        });
        items
    }

    /// Persist the wishlist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if encoding or the backend fails.
    pub fn save_wishlist(&self, items: &[WishlistItem]) -> Result<(), RepositoryError> {
        self.write(WISHLIST_KEY, &items)
    }
}

/// Fold entries that share a key into the first one, respecting its cap.
fn merge_duplicate_items(items: &mut Vec<LineItem>) {
    let mut merged: Vec<LineItem> = Vec::with_capacity(items.len());
    for item in items.drain(..) {
        let key = item.key();
        if let Some(existing) = merged.iter_mut().find(|m| m.matches(&key)) {
            existing.increase(item.quantity);
        } else {
            merged.push(item);
        }
    }
    *items = merged;
}
