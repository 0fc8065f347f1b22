//! Core types for the cart.
//!
//! This module provides type-safe wrappers for the cart's domain concepts.

pub mod cart;
pub mod entry;
pub mod id;
pub mod price;
pub mod quantity;

pub use cart::{Added, Cart, CartTotals};
pub use entry::CartEntry;
pub use id::{ProductId, ProductIdError};
pub use price::{Price, PriceParseError};
pub use quantity::{Quantity, ZeroQuantity};
