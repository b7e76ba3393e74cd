//! Cartwheel Core - Shared types library.
//!
//! This crate provides common types used across all Cartwheel components:
//! - `cart` - Cart, wishlist and promo-code engine
//! - `cli` - Command-line front-end driving the engine
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no persistence,
//! no async runtime. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, amounts, promo codes, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
