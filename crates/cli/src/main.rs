//! Cartwheel CLI - Inspect and edit a persisted cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add a product to the cart
//! cw cart add 42 --name "Linen shirt" --color white --size M --price 600
//!
//! # Apply a promo code
//! cw promo apply save10
//!
//! # Show the cart with totals
//! cw cart show
//!
//! # Save a product for later, then move it to the cart
//! cw wishlist add 7 --name "Sun hat" --price 350
//! cw wishlist move 7 --color straw --size L
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and edit line items
//! - `promo` - Apply, remove and list promo codes
//! - `wishlist` - Manage saved products
//!
//! State lives in `CARTWHEEL_DATA_DIR` (default `.cartwheel`). Set
//! `CARTWHEEL_LOG_FORMAT=json` for JSON logs on stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use cartwheel_cart::CartConfig;
use cartwheel_core::{Amount, ProductId};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::Session;

#[derive(Parser)]
#[command(name = "cw")]
#[command(author, version, about = "Cartwheel cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage promo codes
    Promo {
        #[command(subcommand)]
        action: PromoAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show line items and totals
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a product to the cart
    Add {
        /// Product ID
        product_id: ProductId,

        /// Product display name
        #[arg(short, long)]
        name: String,

        /// Color variant
        #[arg(short, long)]
        color: String,

        /// Size variant
        #[arg(short, long)]
        size: String,

        /// Unit price
        #[arg(short, long)]
        price: Amount,

        /// Price before markdown, if discounted
        #[arg(long)]
        original_price: Option<Amount>,

        /// Number of units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a line item
    Remove {
        /// Product ID
        product_id: ProductId,

        /// Color variant
        #[arg(short, long)]
        color: String,

        /// Size variant
        #[arg(short, long)]
        size: String,
    },
    /// Set the quantity of a line item
    SetQty {
        /// Product ID
        product_id: ProductId,

        /// Color variant
        #[arg(short, long)]
        color: String,

        /// Size variant
        #[arg(short, long)]
        size: String,

        /// New quantity, clamped to the allowed range
        quantity: u32,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum PromoAction {
    /// Apply a promo code
    Apply {
        /// The code, case-insensitive
        code: String,
    },
    /// Remove the applied promo code
    Remove,
    /// List the codes the shop accepts
    List,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// List saved products
    List,
    /// Save a product
    Add {
        /// Product ID
        product_id: ProductId,

        /// Product display name
        #[arg(short, long)]
        name: String,

        /// Unit price
        #[arg(short, long)]
        price: Amount,

        /// Price before markdown, if discounted
        #[arg(long)]
        original_price: Option<Amount>,
    },
    /// Remove a saved product
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Move a saved product into the cart
    Move {
        /// Product ID
        product_id: ProductId,

        /// Color variant
        #[arg(short, long)]
        color: String,

        /// Size variant
        #[arg(short, long)]
        size: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing; logs go to stderr so stdout stays parseable
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cartwheel_cart=warn,cw=info"));

    let json_logs = std::env::var("CARTWHEEL_LOG_FORMAT").is_ok_and(|v| v == "json");
    let json_layer = json_logs.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CartConfig::from_env()?;
    let mut session = Session::open(&config)?;

    let result = match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show { json } => commands::cart::show(&session, json),
            CartAction::Add {
                product_id,
                name,
                color,
                size,
                price,
                original_price,
                quantity,
            } => {
                let product = commands::cart::product(
                    product_id,
                    name,
                    color,
                    size,
                    price,
                    original_price,
                );
                commands::cart::add(&mut session, product, quantity);
                Ok(())
            }
            CartAction::Remove {
                product_id,
                color,
                size,
            } => commands::cart::remove(&mut session, product_id, &color, &size),
            CartAction::SetQty {
                product_id,
                color,
                size,
                quantity,
            } => commands::cart::set_quantity(&mut session, product_id, &color, &size, quantity),
            CartAction::Clear => {
                commands::cart::clear(&mut session);
                Ok(())
            }
        },
        Commands::Promo { action } => match action {
            PromoAction::Apply { code } => commands::promo::apply(&mut session, &code),
            PromoAction::Remove => {
                commands::promo::remove(&mut session);
                Ok(())
            }
            PromoAction::List => {
                commands::promo::list(&session);
                Ok(())
            }
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::List => {
                commands::wishlist::list(&session);
                Ok(())
            }
            WishlistAction::Add {
                product_id,
                name,
                price,
                original_price,
            } => {
                commands::wishlist::add(&mut session, product_id, name, price, original_price);
                Ok(())
            }
            WishlistAction::Remove { product_id } => {
                commands::wishlist::remove(&mut session, product_id)
            }
            WishlistAction::Move {
                product_id,
                color,
                size,
            } => commands::wishlist::move_to_cart(&mut session, product_id, &color, &size),
        },
    };

    // Notices (including follow-ups) are shown even when the command failed.
    session.finish().await;

    result.map_err(Into::into)
}
