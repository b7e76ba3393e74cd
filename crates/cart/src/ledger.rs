//! Ledger of redeemed single-use promo codes.

use cartwheel_core::PromoCode;
use serde::{Deserialize, Serialize};

/// Single-use codes this client has already redeemed, in redemption order.
///
/// The ledger only grows: removing a promo or clearing the cart never takes a
/// code back out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsedCodes(Vec<PromoCode>);

impl UsedCodes {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns `true` if `code` was already redeemed.
    #[must_use]
    pub fn contains(&self, code: &PromoCode) -> bool {
        self.0.contains(code)
    }

    /// Record a redemption. Returns `false` if the code was already present.
    pub fn record(&mut self, code: PromoCode) -> bool {
        if self.contains(&code) {
            return false;
        }
        self.0.push(code);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &PromoCode> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drop duplicates left behind by other writers, keeping first occurrences.
    pub(crate) fn dedup(&mut self) {
        let mut seen = Vec::with_capacity(self.0.len());
        self.0.retain(|code| {
            if seen.contains(code) {
                false
            } else {
                seen.push(code.clone());
                true
            }
        });
    }
}
