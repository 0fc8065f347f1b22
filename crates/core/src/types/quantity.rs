//! Line quantity that can never drop below one.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Number of units of a product in the cart.
///
/// A `Quantity` is always at least 1. Every constructor that accepts
/// untrusted input clamps instead of failing, so a cart line can never be
/// stored or rendered with zero or negative units.
///
/// ## Examples
///
/// ```
/// use storecart_core::Quantity;
///
/// assert_eq!(Quantity::clamped(0).get(), 1);
/// assert_eq!(Quantity::parse_lenient("12 pcs").get(), 12);
/// assert_eq!(Quantity::parse_lenient("abc").get(), 1);
/// assert_eq!(Quantity::ONE.decrement().get(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(NonZeroU32);

/// Error returned when deserializing a zero quantity.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("quantity must be at least 1")]
pub struct ZeroQuantity;

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity, or `None` for zero.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        match NonZeroU32::new(value) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Clamp any integer into the valid range `1..=u32::MAX`.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        let value = u32::try_from(value.max(1)).unwrap_or(u32::MAX);
        Self::new(value).unwrap_or(Self::ONE)
    }

    /// Read a quantity from user-typed text.
    ///
    /// Leading whitespace and an optional sign are accepted, then the
    /// leading run of digits is read and anything after it is ignored.
    /// Text with no leading digits yields 1; results below 1 clamp to 1 and
    /// results above `u32::MAX` saturate.
    #[must_use]
    pub fn parse_lenient(text: &str) -> Self {
        let text = text.trim_start();
        let (negative, rest) = match text.as_bytes().first() {
            Some(b'-') => (true, text.get(1..).unwrap_or("")),
            Some(b'+') => (false, text.get(1..).unwrap_or("")),
            _ => (false, text),
        };

        let mut value: i64 = 0;
        let mut seen_digit = false;
        for digit in rest.chars().map_while(|c| c.to_digit(10)) {
            seen_digit = true;
            value = value.saturating_mul(10).saturating_add(i64::from(digit));
        }

        if !seen_digit {
            return Self::ONE;
        }

        Self::clamped(if negative { -value } else { value })
    }

    /// Get the underlying count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// One more unit, saturating at `u32::MAX`.
    #[must_use]
    pub const fn increment(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// One less unit; has no effect at 1.
    #[must_use]
    pub fn decrement(self) -> Self {
        Self::new(self.get() - 1).unwrap_or(Self::ONE)
    }

    /// Saturating addition of two quantities.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.get()))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Quantity {
    type Error = ZeroQuantity;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ZeroQuantity)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.get()
    }
}
