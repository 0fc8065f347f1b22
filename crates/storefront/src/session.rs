//! Cart session: the owned context for one page load.
//!
//! The session owns the store, the presenter, the notifier and the
//! reconciler. Hosts drive it through [`CartCommand`]s and the direct-edit
//! entry points; every operation mutates, persists and re-renders before
//! returning.

use storecart_core::{
    CartEntry, CartTotals, Price, PriceParseError, ProductId, ProductIdError, Quantity,
};
use thiserror::Error;
use tracing::instrument;

use crate::config::CartConfig;
use crate::error::CartError;
use crate::format::Locale;
use crate::notify::Notifier;
use crate::persistence::{CartStorage, PersistenceAdapter};
use crate::presenter::{CartPresenter, RenderError};
use crate::reconcile::{ProductDraft, QuantityEdit, Reconciler, RowEdit, refresh_aggregates};
use crate::render::{CartRenderer, CartRow};
use crate::store::{CartStore, Persistence};

/// A cart mutation requested by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartCommand {
    /// Add a product, merging with an existing line of the same id.
    AddItem(CartEntry),
    /// Remove a product's line after the presenter confirms.
    RemoveItem(ProductId),
    /// Set a line's quantity; values below 1 clamp to 1.
    SetQuantity { id: ProductId, quantity: i64 },
}

/// Result of a checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Refused: there is nothing to order.
    EmptyCart(String),
    /// The host may navigate to its checkout page.
    Proceed(String),
}

/// Errors reading a catalog add-to-cart button.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid product id: {0}")]
    Id(#[from] ProductIdError),

    #[error("invalid product price: {0}")]
    Price(#[from] PriceParseError),
}

/// A product offered by a catalog add button.
///
/// Catalog buttons always add a single unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: Option<String>,
}

impl CatalogItem {
    /// Read a catalog item from the attribute strings a button carries.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the id is blank or the price has no digits.
    pub fn from_attributes(
        id: &str,
        name: &str,
        price: &str,
        image: Option<&str>,
    ) -> Result<Self, CatalogError> {
        Ok(Self {
            id: ProductId::parse(id)?,
            name: name.trim().to_string(),
            price: Price::parse_display(price)?,
            image: image
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }

    /// The cart entry this item adds.
    #[must_use]
    pub fn to_entry(&self) -> CartEntry {
        let entry = CartEntry::new(self.id.clone(), self.name.clone(), self.price, Quantity::ONE);
        match &self.image {
            Some(image) => entry.with_image(image.clone()),
            None => entry,
        }
    }
}

/// The cart for one page load.
pub struct CartSession<S, P> {
    store: CartStore<S>,
    renderer: CartRenderer,
    reconciler: Reconciler,
    presenter: P,
    notifier: Notifier,
}

impl<S, P> std::fmt::Debug for CartSession<S, P>
where
    S: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartSession")
            .field("store", &self.store)
            .field("reconciler", &self.reconciler)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

impl<S, P> CartSession<S, P>
where
    S: CartStorage,
    P: CartPresenter,
{
    /// Load the cart and render the page once.
    ///
    /// A missing or corrupt record opens an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Render` if the initial render fails.
    #[instrument(skip_all, fields(key = %config.storage_key, locale = %config.locale))]
    pub fn open(
        config: &CartConfig,
        storage: S,
        presenter: P,
        notifier: Notifier,
    ) -> Result<Self, CartError> {
        let store = CartStore::open(PersistenceAdapter::new(storage, config.storage_key.clone()));
        let renderer = CartRenderer::new(config.locale.locale());
        let mut session = Self {
            store,
            renderer,
            reconciler: Reconciler::new(renderer, config.reconcile),
            presenter,
            notifier,
        };

        tracing::info!(items = session.store.query().len(), "Cart opened");
        session.render()?;
        Ok(session)
    }

    /// Apply a command, persist it and re-render.
    ///
    /// Write failures do not stop the render; they are reported as
    /// [`Persistence::Degraded`].
    ///
    /// # Errors
    ///
    /// Returns `CartError::Render` if the presenter fails.
    #[instrument(skip(self), level = "debug")]
    pub fn dispatch(&mut self, command: CartCommand) -> Result<Persistence, CartError> {
        let persistence = match command {
            CartCommand::AddItem(entry) => {
                let persistence = Persistence::of(&self.store.add(entry));
                self.render()?;
                let message = self.locale().added_message;
                self.notifier.show(message);
                return Ok(persistence);
            }
            CartCommand::RemoveItem(id) => {
                let Some(entry) = self.store.cart().get(&id).cloned() else {
                    tracing::debug!(product_id = %id, "Remove ignored, product not in cart");
                    return Ok(self.persistence());
                };
                if !self.presenter.confirm_removal(&entry) {
                    tracing::debug!(product_id = %id, "Removal not confirmed");
                    return Ok(self.persistence());
                }
                Persistence::of(&self.store.remove(&id))
            }
            CartCommand::SetQuantity { id, quantity } => {
                Persistence::of(&self.store.update_quantity(&id, quantity))
            }
        };

        self.render()?;
        Ok(persistence)
    }

    /// Apply a stepper or typed edit to a rendered row.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Render` if the presenter fails.
    pub fn edit_row(&mut self, row: &mut CartRow, edit: &QuantityEdit) -> Result<RowEdit, CartError> {
        Ok(self
            .reconciler
            .edit_row(&mut self.store, &mut self.presenter, row, edit)?)
    }

    /// Apply a stepper or typed edit to a product page draft.
    pub fn edit_draft(&self, draft: &mut ProductDraft, edit: &QuantityEdit) -> Quantity {
        self.reconciler.edit_draft(draft, edit)
    }

    /// Add one unit of a catalog item.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Render` if the presenter fails.
    pub fn add_catalog_item(&mut self, item: &CatalogItem) -> Result<Persistence, CartError> {
        self.dispatch(CartCommand::AddItem(item.to_entry()))
    }

    /// Add a product page draft at its selected quantity.
    ///
    /// A draft without an article gets a generated id.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Render` if the presenter fails.
    pub fn add_draft(&mut self, draft: &ProductDraft) -> Result<Persistence, CartError> {
        let id = draft.id.clone().unwrap_or_else(ProductId::generate);
        self.dispatch(CartCommand::AddItem(draft.to_entry(id)))
    }

    /// Attempt checkout. No order is placed.
    #[must_use]
    pub fn checkout(&self) -> CheckoutOutcome {
        if self.store.cart().is_empty() {
            tracing::info!("Checkout refused, cart is empty");
            return CheckoutOutcome::EmptyCart(self.locale().checkout_empty_message.to_string());
        }

        let totals = self.store.totals();
        tracing::info!(items = totals.item_count, total = totals.total.amount(), "Checkout");
        CheckoutOutcome::Proceed(self.locale().checkout_message.to_string())
    }

    /// Retry persisting the cart after a failed write.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Persist` if the write fails again.
    pub fn flush(&mut self) -> Result<(), CartError> {
        Ok(self.store.flush()?)
    }

    /// The current entries in display order.
    #[must_use]
    pub fn query(&self) -> &[CartEntry] {
        self.store.query()
    }

    #[must_use]
    pub fn totals(&self) -> CartTotals {
        self.store.totals()
    }

    /// Whether the cart on storage is up to date.
    #[must_use]
    pub const fn persistence(&self) -> Persistence {
        if self.store.is_persistent() {
            Persistence::Saved
        } else {
            Persistence::Degraded
        }
    }

    #[must_use]
    pub const fn store(&self) -> &CartStore<S> {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut CartStore<S> {
        &mut self.store
    }

    #[must_use]
    pub const fn renderer(&self) -> &CartRenderer {
        &self.renderer
    }

    #[must_use]
    pub const fn presenter(&self) -> &P {
        &self.presenter
    }

    pub const fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Re-render the listing and aggregates from the store.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Render` if the presenter fails.
    pub fn render(&mut self) -> Result<(), CartError> {
        self.render_views()?;
        Ok(())
    }

    fn render_views(&mut self) -> Result<(), RenderError> {
        self.presenter
            .render_items(&self.renderer.listing(self.store.cart()))?;
        refresh_aggregates(&self.renderer, &self.store, &mut self.presenter)
    }

    const fn locale(&self) -> &'static Locale {
        self.renderer.locale()
    }
}
