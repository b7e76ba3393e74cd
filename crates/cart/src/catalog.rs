//! Promo code catalog.

use cartwheel_core::{Amount, PromoCode, PromoKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Code whose discount is the current shipping fee rather than a fixed value.
pub const FREE_SHIPPING_CODE: &str = "FREESHIP";

/// A promotion that can be redeemed with a code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoRule {
    pub code: PromoCode,
    pub kind: PromoKind,
    /// Percentage (for [`PromoKind::Percentage`]) or amount off.
    pub discount_value: Decimal,
    /// Subtotal the cart must reach before the code is accepted.
    pub minimum_subtotal: Amount,
    /// Single-use codes can be redeemed once per persisted session.
    pub single_use: bool,
    /// Short shopper-facing summary.
    pub description: String,
}

impl PromoRule {
    fn standard(
        code: &str,
        kind: PromoKind,
        discount_value: i64,
        minimum_subtotal: i64,
        single_use: bool,
        description: &str,
    ) -> Option<Self> {
        Some(Self {
            code: PromoCode::parse(code).ok()?,
            kind,
            discount_value: Decimal::from(discount_value),
            minimum_subtotal: Amount::from_units(minimum_subtotal),
            single_use,
            description: description.to_string(),
        })
    }

    /// The promo as it is attached to a cart.
    #[must_use]
    pub fn to_applied(&self) -> AppliedPromo {
        AppliedPromo {
            code: self.code.clone(),
            kind: self.kind,
            discount_value: self.discount_value,
        }
    }
}

/// The promo currently attached to a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedPromo {
    pub code: PromoCode,
    pub kind: PromoKind,
    pub discount_value: Decimal,
}

impl AppliedPromo {
    /// Returns `true` if this promo waives shipping instead of taking a value off.
    #[must_use]
    pub fn is_free_shipping(&self) -> bool {
        self.code == FREE_SHIPPING_CODE
    }
}

/// Read-only lookup of promo rules by code.
#[derive(Debug, Clone, Default)]
pub struct PromoCatalog {
    rules: Vec<PromoRule>,
}

impl PromoCatalog {
    /// Build a catalog from rules. A later rule replaces an earlier one with
    /// the same code.
    #[must_use]
    pub fn new(rules: impl IntoIterator<Item = PromoRule>) -> Self {
        let mut catalog = Self::default();
        for rule in rules {
            if let Some(existing) = catalog.rules.iter_mut().find(|r| r.code == rule.code) {
                *existing = rule;
            } else {
                catalog.rules.push(rule);
            }
        }
        catalog
    }

    /// The storefront's built-in codes.
    ///
    /// | Code | Kind | Value | Minimum | Single-use |
    /// |---|---|---|---|---|
    /// | SAVE10 | percentage | 10 | 500 | no |
    /// | SAVE20 | percentage | 20 | 1000 | no |
    /// | WELCOME100 | fixed | 100 | 800 | no |
    /// | NEWUSER | percentage | 15 | 300 | yes |
    /// | FREESHIP | fixed (= shipping fee) | 100 | 0 | no |
    #[must_use]
    pub fn standard() -> Self {
        Self::new(
            [
                PromoRule::standard(
                    "SAVE10",
                    PromoKind::Percentage,
                    10,
                    500,
                    false,
                    "10% off orders of 500 or more",
                ),
                PromoRule::standard(
                    "SAVE20",
                    PromoKind::Percentage,
                    20,
                    1000,
                    false,
                    "20% off orders of 1000 or more",
                ),
                PromoRule::standard(
                    "WELCOME100",
                    PromoKind::Fixed,
                    100,
                    800,
                    false,
                    "100 off orders of 800 or more",
                ),
                PromoRule::standard(
                    "NEWUSER",
                    PromoKind::Percentage,
                    15,
                    300,
                    true,
                    "15% off your first order of 300 or more",
                ),
                PromoRule::standard(
                    FREE_SHIPPING_CODE,
                    PromoKind::Fixed,
                    100,
                    0,
                    false,
                    "free shipping on any order",
                ),
            ]
            .into_iter()
            .flatten(),
        )
    }

    /// Look up a rule. `code` is normalized first, so lookups are
    /// case-insensitive; malformed input simply finds nothing.
    #[must_use]
    pub fn resolve(&self, code: &str) -> Option<&PromoRule> {
        let code = PromoCode::parse(code).ok()?;
        self.get(&code)
    }

    /// Look up a rule by an already-normalized code.
    #[must_use]
    pub fn get(&self, code: &PromoCode) -> Option<&PromoRule> {
        self.rules.iter().find(|rule| &rule.code == code)
    }

    /// All rules in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &PromoRule> {
        self.rules.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_contents() {
        let catalog = PromoCatalog::standard();
        assert_eq!(catalog.len(), 5);

        let codes: Vec<&str> = catalog.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, ["SAVE10", "SAVE20", "WELCOME100", "NEWUSER", "FREESHIP"]);

        let newuser = catalog.resolve("NEWUSER").unwrap();
        assert_eq!(newuser.kind, PromoKind::Percentage);
        assert_eq!(newuser.discount_value, Decimal::from(15));
        assert_eq!(newuser.minimum_subtotal, Amount::from_units(300));
        assert!(newuser.single_use);

        let welcome = catalog.resolve("WELCOME100").unwrap();
        assert_eq!(welcome.kind, PromoKind::Fixed);
        assert_eq!(welcome.minimum_subtotal, Amount::from_units(800));
        assert!(!welcome.single_use);
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let catalog = PromoCatalog::standard();
        assert!(catalog.resolve("save10").is_some());
        assert!(catalog.resolve("  FreeShip ").is_some());
    }

    #[test]
    fn test_resolve_unknown() {
        let catalog = PromoCatalog::standard();
        assert!(catalog.resolve("SAVE99").is_none());
        assert!(catalog.resolve("").is_none());
        assert!(catalog.resolve("SAVE 10").is_none());
    }

    #[test]
    fn test_later_rule_replaces_earlier() {
        let mut cheaper = PromoCatalog::standard().resolve("SAVE10").unwrap().clone();
        cheaper.minimum_subtotal = Amount::from_units(100);

        let catalog = PromoCatalog::new(PromoCatalog::standard().iter().cloned().chain([cheaper]));

        assert_eq!(catalog.len(), 5);
        assert_eq!(
            catalog.resolve("SAVE10").unwrap().minimum_subtotal,
            Amount::from_units(100)
        );
    }

    #[test]
    fn test_applied_promo_free_shipping_flag() {
        let catalog = PromoCatalog::standard();
        assert!(catalog.resolve("FREESHIP").unwrap().to_applied().is_free_shipping());
        assert!(!catalog.resolve("SAVE10").unwrap().to_applied().is_free_shipping());
    }
}
