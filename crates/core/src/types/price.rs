//! Whole-unit price representation.
//!
//! Prices are non-negative integers in whole currency units (no minor units).
//! All derived figures (line subtotals, cart totals) are exact integer
//! arithmetic. Overflow saturates at `u64::MAX` instead of wrapping.

use core::fmt;
use std::iter::Sum;

use serde::{Deserialize, Serialize};

use super::Quantity;

/// Errors that can occur when reading a [`Price`] from displayed text.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceParseError {
    /// The text contains no digits at all.
    #[error("price text contains no digits")]
    NoDigits,
    /// The digits do not fit in a price.
    #[error("price is too large")]
    Overflow,
}

/// A price in whole currency units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(0);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// Get the underlying amount.
    #[must_use]
    pub const fn amount(self) -> u64 {
        self.0
    }

    /// Read a price from rendered text by keeping only its digits.
    ///
    /// Group separators and currency glyphs are ignored, so `"3 500 ₽"`
    /// and `"$3,500"` both read as 3500.
    ///
    /// # Errors
    ///
    /// Returns [`PriceParseError::NoDigits`] if the text has no digits and
    /// [`PriceParseError::Overflow`] if the number exceeds `u64::MAX`.
    pub fn parse_display(text: &str) -> Result<Self, PriceParseError> {
        let mut amount: u64 = 0;
        let mut seen_digit = false;

        for digit in text.chars().filter_map(|c| c.to_digit(10)) {
            seen_digit = true;
            amount = amount
                .checked_mul(10)
                .and_then(|a| a.checked_add(u64::from(digit)))
                .ok_or(PriceParseError::Overflow)?;
        }

        if seen_digit {
            Ok(Self(amount))
        } else {
            Err(PriceParseError::NoDigits)
        }
    }

    /// Price of `quantity` units at this unit price.
    #[must_use]
    pub fn times(self, quantity: Quantity) -> Self {
        Self(self.0.saturating_mul(u64::from(quantity.get())))
    }

    /// Saturating addition of two prices.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Price {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

impl From<Price> for u64 {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}
