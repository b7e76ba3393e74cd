//! Promo code commands.

use cartwheel_core::PromoKind;

use super::{CommandError, Session};

/// Apply a code. Rejections are reported as notices and as the command error.
pub fn apply(session: &mut Session, code: &str) -> Result<(), CommandError> {
    session.cart.apply_code(code)?;
    Ok(())
}

pub fn remove(session: &mut Session) {
    if session.cart.remove_code().is_none() {
        tracing::info!("no promo code applied");
    }
}

/// Print the catalog.
#[allow(clippy::print_stdout)] // CLI output
pub fn list(session: &Session) {
    let used = session.cart.used_codes();

    for rule in session.cart.catalog().iter() {
        let value = match rule.kind {
            PromoKind::Percentage => format!("{}%", rule.discount_value),
            PromoKind::Fixed => format!("{:.2}", rule.discount_value),
        };
        let mut flags = Vec::new();
        if !rule.minimum_subtotal.is_zero() {
            flags.push(format!("min {}", rule.minimum_subtotal));
        }
        if rule.single_use {
            flags.push(if used.contains(&rule.code) {
                "used".to_owned()
            } else {
                "one-time".to_owned()
            });
        }

        println!(
            "{:<12} {:<10} {:>8}  {}{}",
            rule.code.as_str(),
            rule.kind.to_string(),
            value,
            rule.description,
            if flags.is_empty() {
                String::new()
            } else {
                format!(" ({})", flags.join(", "))
            }
        );
    }
}
