//! Cart commands.

use cartwheel_cart::{CartProduct, LineItemKey};
use cartwheel_core::{Amount, ProductId};

use super::{CommandError, Session};

/// Build a cart product from command-line arguments.
pub fn product(
    product_id: ProductId,
    name: String,
    color: String,
    size: String,
    unit_price: Amount,
    original_unit_price: Option<Amount>,
) -> CartProduct {
    CartProduct {
        product_id,
        name,
        color,
        size,
        unit_price,
        original_unit_price,
    }
}

/// Print the cart.
#[allow(clippy::print_stdout)] // CLI output
pub fn show(session: &Session, json: bool) -> Result<(), CommandError> {
    let cart = &session.cart;
    let totals = cart.totals();

    if json {
        let doc = serde_json::json!({
            "items": cart.items(),
            "promoCode": cart.applied_promo(),
            "totals": totals,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    if cart.is_empty() {
        println!("Your cart is empty.");
        return Ok(());
    }

    for item in cart.items() {
        println!(
            "{:>3} x {} [{} / {}] (#{})  {}",
            item.quantity,
            item.name,
            item.color,
            item.size,
            item.product_id,
            item.line_total()
        );
    }
    println!();
    println!("Items:     {}", totals.item_count);
    println!("Subtotal:  {}", totals.subtotal);
    if !totals.savings.is_zero() {
        println!("You save:  {}", totals.savings);
    }
    println!("Shipping:  {}", totals.shipping);
    if let Some(label) = cart.promo_label() {
        println!("Promo:     {label}  -{}", totals.promo_discount);
    }
    println!("Total:     {}", totals.total);
    Ok(())
}

pub fn add(session: &mut Session, product: CartProduct, quantity: u32) {
    tracing::info!(product_id = %product.product_id, quantity, "adding to cart");
    session.cart.add_item(product, quantity);
}

pub fn remove(
    session: &mut Session,
    product_id: ProductId,
    color: &str,
    size: &str,
) -> Result<(), CommandError> {
    let key = existing_key(session, product_id, color, size)?;
    session.cart.remove_item(&key);
    Ok(())
}

pub fn set_quantity(
    session: &mut Session,
    product_id: ProductId,
    color: &str,
    size: &str,
    quantity: u32,
) -> Result<(), CommandError> {
    let key = existing_key(session, product_id, color, size)?;
    session.cart.set_quantity(&key, quantity);
    Ok(())
}

pub fn clear(session: &mut Session) {
    session.cart.clear();
}

fn existing_key(
    session: &Session,
    product_id: ProductId,
    color: &str,
    size: &str,
) -> Result<LineItemKey, CommandError> {
    let key = LineItemKey::new(product_id, color, size);
    if session.cart.contains(&key) {
        Ok(key)
    } else {
        Err(CommandError::ItemNotFound {
            product_id,
            color: color.to_owned(),
            size: size.to_owned(),
        })
    }
}
