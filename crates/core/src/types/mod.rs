//! Core types for Cartwheel.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod amount;
pub mod id;
pub mod promo_code;
pub mod status;

pub use amount::{Amount, AmountError};
pub use id::*;
pub use promo_code::{PromoCode, PromoCodeError};
pub use status::*;
