//! Direct-edit reconciler.
//!
//! Quantity steppers and typed inputs act on a rendered row first: the row is
//! patched locally so feedback is immediate, then the change is written to
//! the store by the row's id and the aggregates are re-derived from the
//! store. The counter and summary never come from rendered rows.
//!
//! On the product detail page the same edits act on a [`ProductDraft`], which
//! has no store entry until it is explicitly added.

use std::fmt;
use std::str::FromStr;

use storecart_core::{CartEntry, Price, ProductId, Quantity};

use crate::format::Locale;
use crate::persistence::CartStorage;
use crate::presenter::{CartPresenter, RenderError};
use crate::render::{CartRenderer, CartRow};
use crate::store::{CartStore, Persistence};

/// How the page is refreshed after a direct edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconcileStrategy {
    /// Patch the edited row, then refresh the aggregates.
    #[default]
    LocalPatch,
    /// Patch the edited row, then re-render the whole listing as well.
    FullRebuild,
}

impl FromStr for ReconcileStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patch" | "local" => Ok(Self::LocalPatch),
            "rebuild" | "full" => Ok(Self::FullRebuild),
            other => Err(format!("unknown reconcile strategy '{other}' (expected patch or rebuild)")),
        }
    }
}

impl fmt::Display for ReconcileStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LocalPatch => "patch",
            Self::FullRebuild => "rebuild",
        })
    }
}

/// A user edit of a quantity control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityEdit {
    /// The `+` stepper.
    Increment,
    /// The `-` stepper.
    Decrement,
    /// Raw text typed into the quantity input.
    Typed(String),
}

impl QuantityEdit {
    /// The quantity this edit produces from `current`.
    #[must_use]
    pub fn resolve(&self, current: Quantity) -> Quantity {
        match self {
            Self::Increment => current.increment(),
            Self::Decrement => current.decrement(),
            Self::Typed(text) => Quantity::parse_lenient(text),
        }
    }
}

/// Quantity selector state on a product detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    /// Article shown on the page, if any.
    pub id: Option<ProductId>,
    pub title: String,
    pub image: Option<String>,
    pub unit_price: Price,
    pub quantity: Quantity,
    pub subtotal: Price,
    pub subtotal_display: String,
}

impl ProductDraft {
    /// A draft at quantity 1.
    #[must_use]
    pub fn new(title: impl Into<String>, unit_price: Price, locale: &Locale) -> Self {
        Self {
            id: None,
            title: title.into(),
            image: None,
            unit_price,
            quantity: Quantity::ONE,
            subtotal: unit_price,
            subtotal_display: locale.format_price(unit_price),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: ProductId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        let image = image.into();
        self.image = (!image.trim().is_empty()).then_some(image);
        self
    }

    /// Rewrite the quantity and subtotal.
    pub fn set_quantity(&mut self, quantity: Quantity, locale: &Locale) {
        self.quantity = quantity;
        self.subtotal = self.unit_price.times(quantity);
        self.subtotal_display = locale.format_price(self.subtotal);
    }

    /// The cart entry this draft adds, under `id`.
    #[must_use]
    pub fn to_entry(&self, id: ProductId) -> CartEntry {
        let entry = CartEntry::new(id, self.title.clone(), self.unit_price, self.quantity);
        match &self.image {
            Some(image) => entry.with_image(image.clone()),
            None => entry,
        }
    }
}

/// Result of a row edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowEdit {
    /// The quantity the row now shows.
    pub quantity: Quantity,
    /// Whether the row's id had an entry in the store.
    pub tracked: bool,
    pub persistence: Persistence,
}

/// Applies direct edits for one locale and strategy.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler {
    renderer: CartRenderer,
    strategy: ReconcileStrategy,
}

impl Reconciler {
    #[must_use]
    pub const fn new(renderer: CartRenderer, strategy: ReconcileStrategy) -> Self {
        Self { renderer, strategy }
    }

    #[must_use]
    pub const fn strategy(&self) -> ReconcileStrategy {
        self.strategy
    }

    /// Apply `edit` to a rendered row and reconcile the store.
    ///
    /// A failed write degrades persistence but does not stop the aggregates
    /// from being refreshed.
    ///
    /// # Errors
    ///
    /// Returns `RenderError` if the presenter fails.
    pub fn edit_row<S, P>(
        &self,
        store: &mut CartStore<S>,
        presenter: &mut P,
        row: &mut CartRow,
        edit: &QuantityEdit,
    ) -> Result<RowEdit, RenderError>
    where
        S: CartStorage,
        P: CartPresenter,
    {
        let quantity = edit.resolve(row.quantity);
        self.renderer.patch_row(row, quantity);
        presenter.patch_row(row)?;

        let result = store.set_quantity(&row.id, quantity);
        let persistence = Persistence::of(&result);
        let tracked = matches!(result, Ok(true) | Err(_));
        if !tracked {
            tracing::debug!(product_id = %row.id, "Edited row has no cart entry");
        }

        if self.strategy == ReconcileStrategy::FullRebuild {
            presenter.render_items(&self.renderer.listing(store.cart()))?;
        }
        refresh_aggregates(&self.renderer, store, presenter)?;

        Ok(RowEdit {
            quantity,
            tracked,
            persistence,
        })
    }

    /// Apply `edit` to a product page draft. Never touches the store.
    pub fn edit_draft(&self, draft: &mut ProductDraft, edit: &QuantityEdit) -> Quantity {
        let quantity = edit.resolve(draft.quantity);
        draft.set_quantity(quantity, self.renderer.locale());
        quantity
    }
}

/// Push the counter and summary derived from the store.
///
/// # Errors
///
/// Returns `RenderError` if the presenter fails.
pub fn refresh_aggregates<S, P>(
    renderer: &CartRenderer,
    store: &CartStore<S>,
    presenter: &mut P,
) -> Result<(), RenderError>
where
    S: CartStorage,
    P: CartPresenter,
{
    let totals = store.totals();
    presenter.update_counter(&renderer.counter(totals))?;
    presenter.update_summary(&renderer.summary(totals))
}
