//! Promo code application.
//!
//! ```text
//! NoPromo --apply ok--> Applied --remove--> NoPromo
//!                       Applied --apply ok--> Applied (replaced)
//! ```
//!
//! A failed apply leaves the current promo in place. Redeeming a single-use
//! code records it in the ledger for good: removing or replacing the promo
//! afterwards does not give the code back.

use cartwheel_core::{Amount, NoticeLevel, PromoCode, PromoKind};
use thiserror::Error;
use tracing::{info, instrument};

use crate::catalog::{AppliedPromo, PromoRule};
use crate::notice::Notice;
use crate::storage::KeyValueStore;
use crate::store::CartStore;

/// Why a promo code was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromoError {
    /// The code is malformed or not in the catalog.
    #[error("invalid promo code: {code:?}")]
    InvalidCode { code: String },

    /// The cart subtotal is below the code's minimum.
    #[error("promo code {code} requires a subtotal of at least {minimum} (current {subtotal})")]
    MinimumNotMet {
        code: PromoCode,
        minimum: Amount,
        subtotal: Amount,
    },

    /// The single-use code was already redeemed.
    #[error("promo code {code} has already been used")]
    CodeAlreadyUsed { code: PromoCode },
}

impl PromoError {
    /// Category of the notice shown for this error.
    #[must_use]
    pub const fn notice_level(&self) -> NoticeLevel {
        match self {
            Self::InvalidCode { .. } | Self::CodeAlreadyUsed { .. } => NoticeLevel::Error,
            Self::MinimumNotMet { .. } => NoticeLevel::Warning,
        }
    }

    /// Shopper-facing message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCode { .. } => "Invalid promo code".to_string(),
            Self::MinimumNotMet { code, minimum, .. } => {
                format!("Add more items to use {code}: the minimum order is {minimum}")
            }
            Self::CodeAlreadyUsed { code } => {
                format!("Promo code {code} has already been used")
            }
        }
    }
}

impl<S: KeyValueStore> CartStore<S> {
    /// Apply a promo code to the cart.
    ///
    /// The code is case-insensitive. On success the promo replaces any
    /// previously applied one; single-use codes are recorded in the ledger
    /// and a reminder is scheduled as a follow-up notice.
    ///
    /// Every outcome is also reported to the notice sink.
    ///
    /// # Errors
    ///
    /// - `PromoError::InvalidCode` if the code is malformed or unknown
    /// - `PromoError::MinimumNotMet` if the subtotal is below the code's minimum
    /// - `PromoError::CodeAlreadyUsed` if a single-use code was already redeemed
    #[instrument(skip(self))]
    pub fn apply_code(&mut self, raw: &str) -> Result<AppliedPromo, PromoError> {
        let rule = match self.check_code(raw) {
            Ok(rule) => rule,
            Err(e) => {
                info!(error = %e, "promo code rejected");
                self.notify(Notice::new(e.notice_level(), e.user_message()));
                return Err(e);
            }
        };

        let applied = rule.to_applied();
        if let Some(previous) = self.state.applied_promo.replace(applied.clone()) {
            info!(previous = %previous.code, "replacing applied promo");
        }
        if rule.single_use {
            self.state.used_codes.record(rule.code.clone());
        }
        self.persist();

        info!(code = %rule.code, single_use = rule.single_use, "promo code applied");
        self.notify(Notice::success(format!(
            "Promo code {} applied: {}",
            rule.code, rule.description
        )));

        if rule.single_use {
            self.follow_ups.schedule(
                self.follow_up_delay,
                self.sink.clone(),
                Notice::warning(format!(
                    "{} is a one-time code and can't be used again",
                    rule.code
                )),
            );
        }

        Ok(applied)
    }

    /// Remove the applied promo, if any. The used-codes ledger is untouched.
    ///
    /// Returns the promo that was removed.
    #[instrument(skip(self))]
    pub fn remove_code(&mut self) -> Option<AppliedPromo> {
        let removed = self.state.applied_promo.take();
        self.persist();

        if let Some(promo) = &removed {
            info!(code = %promo.code, "promo code removed");
            self.notify(Notice::info(format!("Promo code {} removed", promo.code)));
        }
        removed
    }

    /// Discount the applied promo is worth right now.
    #[must_use]
    pub fn promo_discount(&self) -> Amount {
        self.totals().promo_discount
    }

    /// Human summary of the applied promo, e.g. `"SAVE10 (10% off)"`.
    #[must_use]
    pub fn promo_label(&self) -> Option<String> {
        let promo = self.applied_promo()?;
        let label = if promo.is_free_shipping() {
            "free shipping".to_string()
        } else {
            match promo.kind {
                PromoKind::Percentage => format!("{}% off", promo.discount_value),
                PromoKind::Fixed => format!("{} off", Amount::new(promo.discount_value)),
            }
        };
        Some(format!("{} ({label})", promo.code))
    }

    /// Run the validation steps without changing anything.
    fn check_code(&self, raw: &str) -> Result<PromoRule, PromoError> {
        let invalid = || PromoError::InvalidCode {
            code: raw.trim().to_string(),
        };

        let code = PromoCode::parse(raw).map_err(|_| invalid())?;
        let rule = self.catalog.get(&code).ok_or_else(invalid)?;

        let subtotal = self.totals().subtotal;
        if subtotal < rule.minimum_subtotal {
            return Err(PromoError::MinimumNotMet {
                code,
                minimum: rule.minimum_subtotal,
                subtotal,
            });
        }

        if rule.single_use && self.state.used_codes.contains(&code) {
            return Err(PromoError::CodeAlreadyUsed { code });
        }

        Ok(rule.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::line_item::tests::product;
    use crate::notice::NoticeLog;
    use crate::storage::MemoryStore;

    fn cart_with_subtotal(subtotal: i64) -> (CartStore<MemoryStore>, MemoryStore, Arc<NoticeLog>) {
        let store = MemoryStore::new();
        let log = Arc::new(NoticeLog::new());
        let mut cart = CartStore::open(store.clone(), log.clone());
        if subtotal > 0 {
            cart.add_item(product(1, "red", "M", subtotal), 1);
        }
        (cart, store, log)
    }

    #[test]
    fn test_save10_minimum_boundary() {
        let (mut cart, _, _) = cart_with_subtotal(500);
        assert!(cart.apply_code("SAVE10").is_ok());
        assert_eq!(cart.promo_discount(), Amount::from_units(50));

        let (mut cart, _, _) = cart_with_subtotal(499);
        assert!(matches!(
            cart.apply_code("SAVE10"),
            Err(PromoError::MinimumNotMet { .. })
        ));
        assert!(cart.applied_promo().is_none());
    }

    #[test]
    fn test_codes_are_case_insensitive() {
        let (mut cart, _, _) = cart_with_subtotal(1200);
        let applied = cart.apply_code("  save20 ").unwrap();
        assert_eq!(applied.code, "SAVE20");
        assert_eq!(cart.promo_discount(), Amount::from_units(240));
    }

    #[test]
    fn test_unknown_and_malformed_codes() {
        let (mut cart, _, log) = cart_with_subtotal(1000);

        assert_eq!(
            cart.apply_code("BOGUS"),
            Err(PromoError::InvalidCode {
                code: "BOGUS".to_string()
            })
        );
        assert!(matches!(cart.apply_code(""), Err(PromoError::InvalidCode { .. })));
        assert!(matches!(cart.apply_code("SAVE 10"), Err(PromoError::InvalidCode { .. })));
        assert_eq!(log.levels(), vec![NoticeLevel::Error; 3]);
    }

    #[test]
    fn test_single_use_code_cannot_be_reused() {
        let (mut cart, _, _) = cart_with_subtotal(400);

        assert!(cart.apply_code("NEWUSER").is_ok());
        assert!(cart.used_codes().contains(&PromoCode::parse("NEWUSER").unwrap()));

        cart.remove_code();
        assert!(cart.applied_promo().is_none());
        assert_eq!(cart.used_codes().len(), 1);

        assert!(matches!(
            cart.apply_code("newuser"),
            Err(PromoError::CodeAlreadyUsed { .. })
        ));
    }

    #[test]
    fn test_minimum_checked_before_ledger() {
        let (mut cart, _, _) = cart_with_subtotal(400);
        cart.apply_code("NEWUSER").unwrap();
        let key = cart.items()[0].key();
        cart.remove_item(&key);

        // Subtotal 0 < 300, so the minimum error wins over "already used".
        assert!(matches!(
            cart.apply_code("NEWUSER"),
            Err(PromoError::MinimumNotMet { .. })
        ));
    }

    #[test]
    fn test_used_codes_persist_across_sessions() {
        let (mut cart, store, log) = cart_with_subtotal(400);
        cart.apply_code("NEWUSER").unwrap();
        cart.clear();
        drop(cart);

        let mut reopened = CartStore::open(store, log);
        reopened.add_item(product(2, "red", "M", 400), 1);
        assert!(matches!(
            reopened.apply_code("NEWUSER"),
            Err(PromoError::CodeAlreadyUsed { .. })
        ));
    }

    #[test]
    fn test_replacing_promo_keeps_ledger() {
        let (mut cart, _, _) = cart_with_subtotal(1500);
        cart.apply_code("NEWUSER").unwrap();
        cart.apply_code("SAVE20").unwrap();

        assert_eq!(cart.applied_promo().unwrap().code, "SAVE20");
        assert_eq!(cart.used_codes().len(), 1);
        assert_eq!(cart.promo_discount(), Amount::from_units(300));
    }

    #[test]
    fn test_failed_apply_keeps_current_promo() {
        let (mut cart, _, _) = cart_with_subtotal(600);
        cart.apply_code("SAVE10").unwrap();

        assert!(cart.apply_code("SAVE20").is_err());
        assert_eq!(cart.applied_promo().unwrap().code, "SAVE10");
    }

    #[test]
    fn test_freeship_discount_equals_shipping() {
        let (mut cart, _, _) = cart_with_subtotal(1500);
        cart.apply_code("FREESHIP").unwrap();

        let totals = cart.totals();
        assert_eq!(totals.shipping, Amount::from_units(100));
        assert_eq!(totals.promo_discount, Amount::from_units(100));
        assert_eq!(totals.total, Amount::from_units(1500));
    }

    #[test]
    fn test_freeship_on_empty_cart() {
        let (mut cart, _, _) = cart_with_subtotal(0);
        assert!(cart.apply_code("FREESHIP").is_ok());
        assert_eq!(cart.promo_discount(), Amount::ZERO);
        assert_eq!(cart.totals().total, Amount::ZERO);
    }

    #[test]
    fn test_clear_keeps_used_codes() {
        let (mut cart, _, _) = cart_with_subtotal(400);
        cart.apply_code("NEWUSER").unwrap();
        cart.clear();

        assert!(cart.applied_promo().is_none());
        assert_eq!(cart.used_codes().len(), 1);
    }

    #[test]
    fn test_remove_code_notices() {
        let (mut cart, _, log) = cart_with_subtotal(600);
        assert!(cart.remove_code().is_none());
        assert!(log.is_empty());

        cart.apply_code("SAVE10").unwrap();
        assert!(cart.remove_code().is_some());
        assert_eq!(log.levels(), vec![NoticeLevel::Success, NoticeLevel::Info]);
    }

    #[test]
    fn test_error_notice_levels_are_distinct_from_success() {
        let (mut cart, _, log) = cart_with_subtotal(100);
        let _ = cart.apply_code("SAVE10");
        let _ = cart.apply_code("NOPE");
        let _ = cart.apply_code("FREESHIP");

        assert_eq!(
            log.levels(),
            vec![NoticeLevel::Warning, NoticeLevel::Error, NoticeLevel::Success]
        );
    }

    #[test]
    fn test_promo_label() {
        let (mut cart, _, _) = cart_with_subtotal(1000);
        assert_eq!(cart.promo_label(), None);

        cart.apply_code("SAVE10").unwrap();
        assert_eq!(cart.promo_label().unwrap(), "SAVE10 (10% off)");

        cart.apply_code("WELCOME100").unwrap();
        assert_eq!(cart.promo_label().unwrap(), "WELCOME100 (100.00 off)");

        cart.apply_code("FREESHIP").unwrap();
        assert_eq!(cart.promo_label().unwrap(), "FREESHIP (free shipping)");
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_use_follow_up_notice() {
        let (mut cart, _, log) = cart_with_subtotal(400);
        cart.apply_code("NEWUSER").unwrap();

        assert_eq!(log.levels(), vec![NoticeLevel::Success]);
        assert_eq!(cart.pending_follow_ups(), 1);

        tokio::time::sleep(Duration::from_secs(3)).await;
        tokio::task::yield_now().await;

        assert_eq!(log.levels(), vec![NoticeLevel::Success, NoticeLevel::Warning]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_follow_up_cancelled_when_store_dropped() {
        let (mut cart, _, log) = cart_with_subtotal(400);
        cart.apply_code("NEWUSER").unwrap();
        drop(cart);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(log.levels(), vec![NoticeLevel::Success]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reusable_code_schedules_nothing() {
        let (mut cart, _, _) = cart_with_subtotal(600);
        cart.apply_code("SAVE10").unwrap();
        assert_eq!(cart.pending_follow_ups(), 0);
    }
}
