//! Cart pricing.
//!
//! Everything here is derived from the line items and the applied promo on
//! every read; nothing is stored.

use cartwheel_core::{Amount, PromoKind};
use serde::Serialize;

use crate::catalog::AppliedPromo;
use crate::line_item::LineItem;

/// Shipping rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Subtotal at or above which shipping is free.
    pub free_shipping_threshold: Amount,
    /// Flat fee charged below the threshold.
    pub shipping_fee: Amount,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Amount::from_units(2000),
            shipping_fee: Amount::from_units(100),
        }
    }
}

impl PricingPolicy {
    /// Shipping for a cart with the given subtotal. Empty carts ship free.
    #[must_use]
    pub fn shipping_for(&self, item_count: u32, subtotal: Amount) -> Amount {
        if item_count == 0 || subtotal >= self.free_shipping_threshold {
            Amount::ZERO
        } else {
            self.shipping_fee
        }
    }
}

/// Derived totals for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: u32,
    pub subtotal: Amount,
    pub original_subtotal: Amount,
    pub savings: Amount,
    pub shipping: Amount,
    pub promo_discount: Amount,
    pub total: Amount,
}

impl CartTotals {
    /// Price `items` with an optional promo.
    #[must_use]
    pub fn compute(items: &[LineItem], promo: Option<&AppliedPromo>, policy: &PricingPolicy) -> Self {
        let item_count = items
            .iter()
            .fold(0_u32, |count, item| count.saturating_add(item.quantity));
        let subtotal: Amount = items.iter().map(LineItem::line_total).sum();
        let original_subtotal: Amount = items.iter().map(LineItem::original_line_total).sum();
        let shipping = policy.shipping_for(item_count, subtotal);

        let promo_discount = promo
            .map_or(Amount::ZERO, |promo| promo_discount(promo, subtotal, shipping))
            // Never discount past zero.
            .min(subtotal + shipping);

        Self {
            item_count,
            subtotal,
            original_subtotal,
            savings: original_subtotal - subtotal,
            shipping,
            promo_discount,
            total: subtotal + shipping - promo_discount,
        }
    }
}

/// Discount granted by `promo` for the given subtotal and shipping fee.
#[must_use]
pub fn promo_discount(promo: &AppliedPromo, subtotal: Amount, shipping: Amount) -> Amount {
    if promo.is_free_shipping() {
        return shipping;
    }

    match promo.kind {
        PromoKind::Percentage => subtotal.percent(promo.discount_value),
        PromoKind::Fixed => Amount::new(promo.discount_value),
    }
}
