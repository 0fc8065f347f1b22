//! The cart: an ordered, id-keyed sequence of entries.

use serde::{Deserialize, Serialize};

use super::{CartEntry, Price, ProductId, Quantity};

/// Result of [`Cart::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Added {
    /// A new line was appended at the end of the cart.
    Appended,
    /// The product was already in the cart; its quantity grew.
    Merged {
        /// Quantity of the line after the merge.
        quantity: Quantity,
    },
}

/// Aggregate figures derived from a cart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of all line quantities.
    pub item_count: u64,
    /// Sum of all line subtotals.
    pub total: Price,
}

/// The user's cart.
///
/// Insertion order is preserved for display. At most one entry exists per
/// [`ProductId`]; every constructor and mutation keeps that invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartEntry>", into = "Vec<CartEntry>")]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a cart from entries, merging duplicate ids.
    ///
    /// The first occurrence of an id keeps its position, title, price and
    /// image; later duplicates only contribute their quantity.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = CartEntry>) -> Self {
        let mut cart = Self::new();
        for entry in entries {
            cart.add(entry);
        }
        cart
    }

    /// The entries in display order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Iterate over the entries in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, CartEntry> {
        self.entries.iter()
    }

    /// Look up the entry for a product.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    /// Whether the product has a line in the cart.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct lines.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a product.
    ///
    /// If the id is already present its quantity is increased by
    /// `entry.quantity`; otherwise the entry is appended.
    pub fn add(&mut self, entry: CartEntry) -> Added {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.id == entry.id) {
            existing.quantity = existing.quantity.saturating_add(entry.quantity);
            return Added::Merged {
                quantity: existing.quantity,
            };
        }

        self.entries.push(entry);
        Added::Appended
    }

    /// Remove a product's line, returning it if it was present.
    pub fn remove(&mut self, id: &ProductId) -> Option<CartEntry> {
        let index = self.entries.iter().position(|entry| &entry.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Set the quantity of a product's line.
    ///
    /// Returns `false` (and changes nothing) if the product is not in the cart.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: Quantity) -> bool {
        match self.entries.iter_mut().find(|entry| &entry.id == id) {
            Some(entry) => {
                entry.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.entries
            .iter()
            .fold(0_u64, |sum, entry| sum.saturating_add(u64::from(entry.quantity.get())))
    }

    /// Sum of all line subtotals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.entries.iter().map(CartEntry::subtotal).sum()
    }

    /// Item count and total together.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals {
            item_count: self.item_count(),
            total: self.total(),
        }
    }
}

impl From<Vec<CartEntry>> for Cart {
    fn from(entries: Vec<CartEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<Cart> for Vec<CartEntry> {
    fn from(cart: Cart) -> Self {
        cart.entries
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartEntry;
    type IntoIter = std::slice::Iter<'a, CartEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
