//! storecart core - cart data model.
//!
//! This crate provides the types shared by every part of the storefront cart:
//! - [`ProductId`] - stable product identifier, the cart key
//! - [`Price`] - whole-unit prices with exact integer arithmetic
//! - [`Quantity`] - line quantity that can never drop below 1
//! - [`CartEntry`] and [`Cart`] - the ordered, id-keyed cart itself
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no storage, no
//! rendering, no timers. Persistence and presentation live in `storecart`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
