//! Cart line items.

use cartwheel_core::{Amount, ProductId};
use serde::{Deserialize, Serialize};

/// Quantity cap given to every line item when it is first added.
pub const DEFAULT_MAX_QUANTITY: u32 = 10;

/// Identity of a line item: one entry per product, color and size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineItemKey {
    pub product_id: ProductId,
    pub color: String,
    pub size: String,
}

impl LineItemKey {
    #[must_use]
    pub fn new(product_id: ProductId, color: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            product_id,
            color: color.into(),
            size: size.into(),
        }
    }
}

/// A product as offered on the product page, before it is in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartProduct {
    pub product_id: ProductId,
    pub name: String,
    pub color: String,
    pub size: String,
    /// Price actually charged.
    pub unit_price: Amount,
    /// Price before markdown, if the product is on sale.
    pub original_unit_price: Option<Amount>,
}

impl CartProduct {
    /// The key this product will occupy in the cart.
    #[must_use]
    pub fn key(&self) -> LineItemKey {
        LineItemKey::new(self.product_id, self.color.clone(), self.size.clone())
    }
}

/// One entry in the cart.
///
/// Serialized in the storefront's camelCase layout (`productId`, `price`,
/// `originalPrice`, `maxQuantity`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    #[serde(default)]
    pub name: String,
    pub color: String,
    pub size: String,
    pub quantity: u32,
    #[serde(rename = "price")]
    pub unit_price: Amount,
    #[serde(
        rename = "originalPrice",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub original_unit_price: Option<Amount>,
    #[serde(default = "default_max_quantity")]
    pub max_quantity: u32,
}

const fn default_max_quantity() -> u32 {
    DEFAULT_MAX_QUANTITY
}

impl LineItem {
    /// Create a new line item, clamping `quantity` into `1..=DEFAULT_MAX_QUANTITY`.
    #[must_use]
    pub fn new(product: CartProduct, quantity: u32) -> Self {
        Self {
            product_id: product.product_id,
            name: product.name,
            color: product.color,
            size: product.size,
            quantity: quantity.clamp(1, DEFAULT_MAX_QUANTITY),
            unit_price: product.unit_price,
            original_unit_price: product.original_unit_price,
            max_quantity: DEFAULT_MAX_QUANTITY,
        }
    }

    #[must_use]
    pub fn key(&self) -> LineItemKey {
        LineItemKey::new(self.product_id, self.color.clone(), self.size.clone())
    }

    /// Returns `true` if this item has the given key.
    #[must_use]
    pub fn matches(&self, key: &LineItemKey) -> bool {
        self.product_id == key.product_id && self.color == key.color && self.size == key.size
    }

    /// Add to the quantity; anything above `max_quantity` is dropped.
    pub fn increase(&mut self, quantity: u32) {
        self.quantity = self
            .quantity
            .saturating_add(quantity)
            .min(self.max_quantity);
    }

    /// Set the quantity, clamped into `1..=max_quantity`.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.clamp(1, self.max_quantity);
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Amount {
        self.unit_price * self.quantity
    }

    /// `(original_unit_price or unit_price) × quantity`.
    #[must_use]
    pub fn original_line_total(&self) -> Amount {
        self.original_unit_price.unwrap_or(self.unit_price) * self.quantity
    }

    /// Repair an item read from storage so the quantity invariant holds.
    /// The cap itself is never allowed above [`DEFAULT_MAX_QUANTITY`].
    pub(crate) fn sanitize(&mut self) {
        if self.max_quantity == 0 || self.max_quantity > DEFAULT_MAX_QUANTITY {
            self.max_quantity = DEFAULT_MAX_QUANTITY;
        }
        self.quantity = self.quantity.clamp(1, self.max_quantity);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn product(id: i32, color: &str, size: &str, price: i64) -> CartProduct {
        CartProduct {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            color: color.to_string(),
            size: size.to_string(),
            unit_price: Amount::from_units(price),
            original_unit_price: None,
        }
    }

    #[test]
    fn test_new_clamps_quantity() {
        assert_eq!(LineItem::new(product(1, "red", "M", 10), 0).quantity, 1);
        assert_eq!(LineItem::new(product(1, "red", "M", 10), 25).quantity, 10);
        assert_eq!(LineItem::new(product(1, "red", "M", 10), 3).max_quantity, 10);
    }

    #[test]
    fn test_increase_caps_at_max() {
        let mut item = LineItem::new(product(1, "red", "M", 10), 8);
        item.increase(5);
        assert_eq!(item.quantity, 10);
        item.increase(u32::MAX);
        assert_eq!(item.quantity, 10);
    }

    #[test]
    fn test_set_quantity_clamps() {
        let mut item = LineItem::new(product(1, "red", "M", 10), 2);
        item.set_quantity(0);
        assert_eq!(item.quantity, 1);
        item.set_quantity(11);
        assert_eq!(item.quantity, 10);
        item.set_quantity(4);
        assert_eq!(item.quantity, 4);
    }

    #[test]
    fn test_line_totals() {
        let mut p = product(1, "red", "M", 300);
        p.original_unit_price = Some(Amount::from_units(400));
        let item = LineItem::new(p, 2);

        assert_eq!(item.line_total(), Amount::from_units(600));
        assert_eq!(item.original_line_total(), Amount::from_units(800));
    }

    #[test]
    fn test_matches_key() {
        let item = LineItem::new(product(1, "red", "M", 10), 1);
        assert!(item.matches(&LineItemKey::new(ProductId::new(1), "red", "M")));
        assert!(!item.matches(&LineItemKey::new(ProductId::new(1), "red", "L")));
        assert!(!item.matches(&LineItemKey::new(ProductId::new(1), "blue", "M")));
        assert!(!item.matches(&LineItemKey::new(ProductId::new(2), "red", "M")));
    }

    #[test]
    fn test_serde_layout() {
        let item = LineItem::new(product(5, "black", "XL", 1200), 2);
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["productId"], 5);
        assert_eq!(json["price"], "1200");
        assert_eq!(json["maxQuantity"], 10);
        assert!(json.get("originalPrice").is_none());
    }

    #[test]
    fn test_sanitize_repairs_stored_item() {
        let mut item: LineItem = serde_json::from_str(
            r#"{"productId":1,"color":"red","size":"M","quantity":0,"price":10,"maxQuantity":0}"#,
        )
        .unwrap();
        item.sanitize();

        assert_eq!(item.max_quantity, 10);
        assert_eq!(item.quantity, 1);
        assert_eq!(item.name, "");
    }

    #[test]
    fn test_sanitize_caps_stored_max_quantity() {
        let mut item: LineItem = serde_json::from_str(
            r#"{"productId":1,"color":"red","size":"M","quantity":50,"price":10,"maxQuantity":50}"#,
        )
        .unwrap();
        item.sanitize();

        assert_eq!(item.max_quantity, DEFAULT_MAX_QUANTITY);
        assert_eq!(item.quantity, DEFAULT_MAX_QUANTITY);

        item.increase(5);
        assert_eq!(item.quantity, DEFAULT_MAX_QUANTITY);
    }

    #[test]
    fn test_line_total_at_max_price() {
        let mut item = LineItem::new(product(1, "red", "M", 0), DEFAULT_MAX_QUANTITY);
        item.unit_price = Amount::MAX;
        assert_eq!(item.line_total(), Amount::from_units(10_000_000_000_000));
    }
}
