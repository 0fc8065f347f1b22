//! The cart store: canonical in-memory cart with write-through persistence.
//!
//! Every mutation changes memory first and then writes the whole cart
//! through the [`PersistenceAdapter`] before returning. A failed write is
//! reported to the caller but never rolls back memory: for the rest of the
//! session the in-memory cart is authoritative and the store reports itself
//! as non-persistent until a later write succeeds.

use storecart_core::{Added, Cart, CartEntry, CartTotals, ProductId, Quantity};

use crate::persistence::{CartStorage, PersistError, PersistenceAdapter};

/// Whether a mutation's write-through reached storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// The cart on storage matches memory.
    Saved,
    /// The write failed; memory is ahead of storage.
    Degraded,
}

impl Persistence {
    /// Classify the result of a store mutation.
    #[must_use]
    pub const fn of<T>(result: &Result<T, PersistError>) -> Self {
        match result {
            Ok(_) => Self::Saved,
            Err(_) => Self::Degraded,
        }
    }
}

/// Canonical cart state for one page load.
#[derive(Debug)]
pub struct CartStore<S> {
    cart: Cart,
    persistence: PersistenceAdapter<S>,
    persistent: bool,
}

impl<S: CartStorage> CartStore<S> {
    /// Open the store, loading the cart from persistence.
    ///
    /// Never fails: an absent or unparseable record gives an empty cart.
    pub fn open(persistence: PersistenceAdapter<S>) -> Self {
        let cart = persistence.load();
        Self {
            cart,
            persistence,
            persistent: true,
        }
    }

    /// Add a product, merging with an existing line of the same id.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if the write failed. The addition is kept in
    /// memory either way.
    pub fn add(&mut self, entry: CartEntry) -> Result<Added, PersistError> {
        let id = entry.id.clone();
        let added = self.cart.add(entry);
        tracing::debug!(product_id = %id, ?added, "Added to cart");
        self.persist()?;
        Ok(added)
    }

    /// Remove a product's line.
    ///
    /// Removing an id that is not in the cart is a no-op and issues no write.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if the write failed. The removal is kept in
    /// memory either way.
    pub fn remove(&mut self, id: &ProductId) -> Result<Option<CartEntry>, PersistError> {
        let Some(removed) = self.cart.remove(id) else {
            tracing::debug!(product_id = %id, "Remove ignored, product not in cart");
            return Ok(None);
        };
        self.persist()?;
        Ok(Some(removed))
    }

    /// Set the quantity of a product's line.
    ///
    /// The quantity is clamped to at least 1. Updating an id that is not in
    /// the cart is a no-op; the return value says whether a line changed.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if the write failed. The update is kept in
    /// memory either way.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) -> Result<bool, PersistError> {
        self.set_quantity(id, Quantity::clamped(quantity))
    }

    /// Set the quantity of a product's line from an already valid quantity.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if the write failed.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: Quantity) -> Result<bool, PersistError> {
        if !self.cart.set_quantity(id, quantity) {
            tracing::debug!(product_id = %id, "Quantity update ignored, product not in cart");
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Remove every line and delete the stored record.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if the record could not be deleted. The cart
    /// is emptied in memory either way.
    pub fn clear(&mut self) -> Result<(), PersistError> {
        self.cart.clear();
        let result = self.persistence.discard();
        self.record_outcome(result)
    }

    /// The current entries in display order.
    #[must_use]
    pub fn query(&self) -> &[CartEntry] {
        self.cart.entries()
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Aggregate figures for the current cart.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        self.cart.totals()
    }

    /// Whether the last write reached storage.
    #[must_use]
    pub const fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Retry writing the current cart.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if the write failed again.
    pub fn flush(&mut self) -> Result<(), PersistError> {
        self.persist()
    }

    /// The persistence adapter.
    pub const fn persistence(&self) -> &PersistenceAdapter<S> {
        &self.persistence
    }

    /// Mutable access to the persistence adapter.
    pub const fn persistence_mut(&mut self) -> &mut PersistenceAdapter<S> {
        &mut self.persistence
    }

    fn persist(&mut self) -> Result<(), PersistError> {
        let result = self.persistence.save(&self.cart);
        self.record_outcome(result)
    }

    fn record_outcome(&mut self, result: Result<(), PersistError>) -> Result<(), PersistError> {
        match result {
            Ok(()) => {
                if !self.persistent {
                    tracing::info!(key = %self.persistence.key(), "Cart persistence restored");
                }
                self.persistent = true;
                Ok(())
            }
            Err(e) => {
                if self.persistent {
                    tracing::warn!(
                        key = %self.persistence.key(),
                        error = %e,
                        "Cart write failed, continuing without persistence"
                    );
                }
                self.persistent = false;
                Err(e)
            }
        }
    }
}
