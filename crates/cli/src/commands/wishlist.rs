//! Wishlist commands.

use cartwheel_cart::WishlistItem;
use cartwheel_core::{Amount, ProductId};

use super::{CommandError, Session};

/// Print saved products.
#[allow(clippy::print_stdout)] // CLI output
pub fn list(session: &Session) {
    if session.wishlist.is_empty() {
        println!("Your wishlist is empty.");
        return;
    }

    for item in session.wishlist.items() {
        match item.original_unit_price {
            Some(original) => println!(
                "#{:<6} {}  {} (was {})",
                item.product_id, item.name, item.unit_price, original
            ),
            None => println!("#{:<6} {}  {}", item.product_id, item.name, item.unit_price),
        }
    }
}

pub fn add(
    session: &mut Session,
    product_id: ProductId,
    name: String,
    price: Amount,
    original_price: Option<Amount>,
) {
    let mut item = WishlistItem::new(product_id, name, price);
    if let Some(original) = original_price {
        item = item.with_original_price(original);
    }

    if !session.wishlist.add(item) {
        tracing::info!(%product_id, "already on the wishlist");
    }
}

pub fn remove(session: &mut Session, product_id: ProductId) -> Result<(), CommandError> {
    session
        .wishlist
        .remove(product_id)
        .map(|_| ())
        .ok_or(CommandError::NotSaved(product_id))
}

pub fn move_to_cart(
    session: &mut Session,
    product_id: ProductId,
    color: &str,
    size: &str,
) -> Result<(), CommandError> {
    let Session { cart, wishlist, .. } = session;
    if wishlist.move_to_cart(product_id, color, size, cart) {
        Ok(())
    } else {
        Err(CommandError::NotSaved(product_id))
    }
}
