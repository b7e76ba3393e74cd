//! The cart store.
//!
//! `CartStore` is the single writer for cart state. Every mutation updates
//! memory first and then persists through the repository. A failed write is
//! logged and otherwise ignored: the shopper keeps a working cart and at most
//! the latest change is lost.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, instrument, warn};

use crate::catalog::{AppliedPromo, PromoCatalog};
use crate::config::CartConfig;
use crate::follow_up::FollowUps;
use crate::ledger::UsedCodes;
use crate::line_item::{CartProduct, LineItem, LineItemKey};
use crate::notice::{Notice, NoticeSink};
use crate::pricing::{CartTotals, PricingPolicy};
use crate::repository::{CartState, Repository};
use crate::storage::KeyValueStore;

/// Default delay before the single-use reminder is shown.
pub const DEFAULT_FOLLOW_UP_DELAY: Duration = Duration::from_secs(2);

/// Shopping cart with promo codes, backed by a key-value store.
pub struct CartStore<S: KeyValueStore> {
    pub(crate) state: CartState,
    pub(crate) repo: Repository<S>,
    pub(crate) catalog: PromoCatalog,
    pub(crate) policy: PricingPolicy,
    pub(crate) sink: Arc<dyn NoticeSink>,
    pub(crate) follow_ups: FollowUps,
    pub(crate) follow_up_delay: Duration,
}

impl<S: KeyValueStore> std::fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("state", &self.state)
            .field("policy", &self.policy)
            .field("follow_up_delay", &self.follow_up_delay)
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore> CartStore<S> {
    /// Open the cart persisted in `store`, using the standard catalog and
    /// pricing policy.
    ///
    /// Unreadable stored state is discarded (and logged) rather than failing.
    /// A stored promo that no longer validates against the catalog is dropped.
    pub fn open(store: S, sink: Arc<dyn NoticeSink>) -> Self {
        let repo = Repository::new(store);
        let state = repo.load_cart();

        let mut cart = Self {
            state,
            repo,
            catalog: PromoCatalog::standard(),
            policy: PricingPolicy::default(),
            sink,
            follow_ups: FollowUps::new(),
            follow_up_delay: DEFAULT_FOLLOW_UP_DELAY,
        };
        cart.revalidate_promo();
        cart
    }

    /// Open the cart with settings from `config`.
    pub fn from_config(store: S, sink: Arc<dyn NoticeSink>, config: &CartConfig) -> Self {
        Self::open(store, sink).with_follow_up_delay(config.follow_up_delay)
    }

    /// Replace the promo catalog. The applied promo is re-checked against it.
    #[must_use]
    pub fn with_catalog(mut self, catalog: PromoCatalog) -> Self {
        self.catalog = catalog;
        self.revalidate_promo();
        self
    }

    /// Replace the shipping policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: PricingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Change the delay of follow-up notices.
    #[must_use]
    pub const fn with_follow_up_delay(mut self, delay: Duration) -> Self {
        self.follow_up_delay = delay;
        self
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.state.items
    }

    /// The line item with `key`, if present.
    #[must_use]
    pub fn item(&self, key: &LineItemKey) -> Option<&LineItem> {
        self.state.items.iter().find(|item| item.matches(key))
    }

    #[must_use]
    pub fn contains(&self, key: &LineItemKey) -> bool {
        self.item(key).is_some()
    }

    /// Quantity of `key` in the cart, zero if absent.
    #[must_use]
    pub fn quantity_of(&self, key: &LineItemKey) -> u32 {
        self.item(key).map_or(0, |item| item.quantity)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    #[must_use]
    pub const fn applied_promo(&self) -> Option<&AppliedPromo> {
        self.state.applied_promo.as_ref()
    }

    #[must_use]
    pub const fn used_codes(&self) -> &UsedCodes {
        &self.state.used_codes
    }

    #[must_use]
    pub const fn catalog(&self) -> &PromoCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Current totals, computed from the items and applied promo.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals::compute(
            &self.state.items,
            self.state.applied_promo.as_ref(),
            &self.policy,
        )
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` of `product`.
    ///
    /// An existing line with the same product, color and size is increased up
    /// to its cap; the excess is dropped. A quantity of zero counts as one.
    #[instrument(skip(self, product), fields(product_id = %product.product_id))]
    pub fn add_item(&mut self, product: CartProduct, quantity: u32) {
        let quantity = quantity.max(1);
        let key = product.key();

        if let Some(existing) = self.state.items.iter_mut().find(|item| item.matches(&key)) {
            existing.increase(quantity);
            debug!(quantity = existing.quantity, "increased line item");
        } else {
            let item = LineItem::new(product, quantity);
            debug!(quantity = item.quantity, "added line item");
            self.state.items.push(item);
        }

        self.after_items_changed();
    }

    /// Remove the line with `key`. Missing keys are ignored.
    #[instrument(skip(self), fields(product_id = %key.product_id))]
    pub fn remove_item(&mut self, key: &LineItemKey) {
        let before = self.state.items.len();
        self.state.items.retain(|item| !item.matches(key));

        if self.state.items.len() != before {
            debug!("removed line item");
            self.after_items_changed();
        }
    }

    /// Set the quantity of the line with `key`, clamped into `1..=max_quantity`.
    /// Missing keys are ignored.
    #[instrument(skip(self), fields(product_id = %key.product_id))]
    pub fn set_quantity(&mut self, key: &LineItemKey, quantity: u32) {
        let Some(item) = self.state.items.iter_mut().find(|item| item.matches(key)) else {
            return;
        };

        item.set_quantity(quantity);
        debug!(quantity = item.quantity, "set line item quantity");
        self.after_items_changed();
    }

    /// Remove every line item and the applied promo. The used-codes ledger is
    /// kept.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.state.items.clear();
        self.state.applied_promo = None;
        debug!("cleared cart");
        self.persist();
    }

    /// Cancel follow-up notices that have not fired yet.
    pub fn cancel_follow_ups(&mut self) {
        self.follow_ups.cancel_all();
    }

    /// Number of follow-up notices still waiting to fire.
    #[must_use]
    pub fn pending_follow_ups(&self) -> usize {
        self.follow_ups.pending()
    }

    /// Wait until every scheduled follow-up notice has been delivered.
    pub async fn settle(&mut self) {
        self.follow_ups.wait_all().await;
    }

    // =========================================================================
    // Internals
    // =========================================================================

    pub(crate) fn notify(&self, notice: Notice) {
        self.sink.notify(notice);
    }

    fn after_items_changed(&mut self) {
        self.revalidate_promo();
        self.persist();
    }

    /// Drop the applied promo if the cart no longer qualifies for it.
    ///
    /// A promo that still qualifies takes its kind and value from the
    /// catalog, never from what was stored.
    fn revalidate_promo(&mut self) {
        let Some(applied) = &self.state.applied_promo else {
            return;
        };

        let subtotal = self.totals().subtotal;
        let notice = match self.catalog.get(&applied.code) {
            None => {
                warn!(code = %applied.code, "applied promo is not in the catalog, dropping it");
                Notice::warning(format!("Promo code {} is no longer available", applied.code))
            }
            Some(rule) if subtotal < rule.minimum_subtotal => Notice::warning(format!(
                "Promo code {} removed: orders must be at least {} to use it",
                applied.code, rule.minimum_subtotal
            )),
            Some(rule) => {
                let current = rule.to_applied();
                if *applied != current {
                    warn!(code = %applied.code, "stored promo terms differ from the catalog, updating them");
                    self.state.applied_promo = Some(current);
                    self.persist();
                }
                return;
            }
        };

        debug!(code = %applied.code, %subtotal, "dropping applied promo");
        self.state.applied_promo = None;
        self.notify(notice);
        self.persist();
    }

    pub(crate) fn persist(&self) {
        if let Err(e) = self.repo.save_cart(&self.state) {
            error!(error = %e, "failed to persist cart state");
        }
    }
}
