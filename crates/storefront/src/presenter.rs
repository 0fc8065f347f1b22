//! Presenter hooks and the bundled HTML presenter.
//!
//! The cart core never touches markup. It calls a [`CartPresenter`] with
//! view models and the host decides how they become visible. [`HtmlPage`]
//! renders them through askama templates and keeps the latest fragment of
//! every region, which is what a server-rendered or HTMX host swaps in.

use askama::Template;
use storecart_core::{CartEntry, ProductId};
use thiserror::Error;

use crate::format::Locale;
use crate::notify::{ToastEvent, ToastId, ToastPhase};
use crate::render::{CartListing, CartRow, CounterBadge, OrderSummary};

/// Errors raised while presenting views.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// A host-specific presenter failed.
    #[error("Presenter error: {0}")]
    Host(String),
}

/// Render hooks the cart calls into.
///
/// Each hook is a projection of the current cart (or one of its aggregates)
/// onto the page.
pub trait CartPresenter {
    /// Replace the whole item list.
    ///
    /// # Errors
    ///
    /// Returns `RenderError` if the list could not be presented.
    fn render_items(&mut self, listing: &CartListing) -> Result<(), RenderError>;

    /// Update the counter badge.
    ///
    /// # Errors
    ///
    /// Returns `RenderError` if the badge could not be presented.
    fn update_counter(&mut self, badge: &CounterBadge) -> Result<(), RenderError>;

    /// Update the total price and order summary.
    ///
    /// # Errors
    ///
    /// Returns `RenderError` if the summary could not be presented.
    fn update_summary(&mut self, summary: &OrderSummary) -> Result<(), RenderError>;

    /// Update a single row in place after a direct edit.
    ///
    /// # Errors
    ///
    /// Returns `RenderError` if the row could not be presented.
    fn patch_row(&mut self, row: &CartRow) -> Result<(), RenderError>;

    /// Ask the user whether `entry` should really be removed.
    fn confirm_removal(&mut self, _entry: &CartEntry) -> bool {
        true
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Full item list fragment.
#[derive(Template)]
#[template(path = "cart/items.html")]
struct CartItemsTemplate<'a> {
    rows: &'a [CartRow],
    empty_message: &'a str,
    checkout_visible: bool,
    checkout_label: &'a str,
    remove_label: &'a str,
}

/// Single row fragment.
#[derive(Template)]
#[template(path = "cart/row.html")]
struct CartRowTemplate<'a> {
    row: &'a CartRow,
    remove_label: &'a str,
}

/// Counter badge fragment.
#[derive(Template)]
#[template(path = "partials/cart_count.html")]
struct CartCountTemplate<'a> {
    badge: &'a CounterBadge,
}

/// Order summary fragment.
#[derive(Template)]
#[template(path = "partials/cart_summary.html")]
struct CartSummaryTemplate<'a> {
    summary: &'a OrderSummary,
}

/// Toast fragment.
#[derive(Template)]
#[template(path = "partials/notification.html")]
struct NotificationTemplate<'a> {
    id: ToastId,
    message: &'a str,
    visible: bool,
}

// =============================================================================
// HtmlPage
// =============================================================================

/// Presenter that renders every region to HTML.
///
/// Row patches update both the row fragment and the item list, so either
/// can be swapped into the page.
#[derive(Debug, Clone)]
pub struct HtmlPage {
    locale: &'static Locale,
    listing: CartListing,
    items: String,
    rows: Vec<(ProductId, String)>,
    counter: String,
    summary: String,
    toasts: Vec<(ToastId, String)>,
    full_renders: usize,
    row_patches: usize,
    confirm_removals: bool,
}

impl HtmlPage {
    /// Create an empty page for `locale`.
    #[must_use]
    pub const fn new(locale: &'static Locale) -> Self {
        Self {
            locale,
            listing: CartListing::Empty {
                message: String::new(),
            },
            items: String::new(),
            rows: Vec::new(),
            counter: String::new(),
            summary: String::new(),
            toasts: Vec::new(),
            full_renders: 0,
            row_patches: 0,
            confirm_removals: true,
        }
    }

    /// Answer every removal confirmation with `confirm`.
    pub const fn set_confirm_removals(&mut self, confirm: bool) {
        self.confirm_removals = confirm;
    }

    /// The item list, including in-place row patches.
    #[must_use]
    pub fn items_html(&self) -> &str {
        &self.items
    }

    /// The current fragment of one row, including in-place patches.
    #[must_use]
    pub fn row_html(&self, id: &ProductId) -> Option<&str> {
        self.rows
            .iter()
            .find(|(row_id, _)| row_id == id)
            .map(|(_, html)| html.as_str())
    }

    /// Number of rows currently on the page.
    #[must_use]
    pub const fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The counter badge fragment.
    #[must_use]
    pub fn counter_html(&self) -> &str {
        &self.counter
    }

    /// The order summary fragment.
    #[must_use]
    pub fn summary_html(&self) -> &str {
        &self.summary
    }

    /// Toast fragments currently in the tree, oldest first.
    #[must_use]
    pub fn toasts(&self) -> &[(ToastId, String)] {
        &self.toasts
    }

    /// How many full item-list renders have happened.
    #[must_use]
    pub const fn full_renders(&self) -> usize {
        self.full_renders
    }

    /// How many single-row patches have happened.
    #[must_use]
    pub const fn row_patches(&self) -> usize {
        self.row_patches
    }

    /// Apply a toast phase change.
    ///
    /// # Errors
    ///
    /// Returns `RenderError` if the toast template fails.
    pub fn apply_toast(&mut self, event: &ToastEvent) -> Result<(), RenderError> {
        if event.phase == ToastPhase::Removed {
            self.toasts.retain(|(id, _)| *id != event.id);
            return Ok(());
        }

        let html = NotificationTemplate {
            id: event.id,
            message: &event.message,
            visible: event.phase.is_visible(),
        }
        .render()?;

        match self.toasts.iter_mut().find(|(id, _)| *id == event.id) {
            Some((_, existing)) => *existing = html,
            None if event.phase == ToastPhase::Showing => self.toasts.push((event.id, html)),
            None => tracing::debug!(toast_id = %event.id, "Ignoring phase for toast not in tree"),
        }
        Ok(())
    }

    fn render_listing(&mut self) -> Result<(), RenderError> {
        let message = match &self.listing {
            CartListing::Empty { message } => message.as_str(),
            CartListing::Items { .. } => self.locale.empty_cart_message,
        };

        let html = CartItemsTemplate {
            rows: self.listing.rows(),
            empty_message: message,
            checkout_visible: self.listing.checkout_visible(),
            checkout_label: self.locale.checkout_label,
            remove_label: self.locale.remove_label,
        }
        .render()?;
        self.items = html;
        Ok(())
    }

    fn render_row(&self, row: &CartRow) -> Result<String, RenderError> {
        Ok(CartRowTemplate {
            row,
            remove_label: self.locale.remove_label,
        }
        .render()?)
    }
}

impl CartPresenter for HtmlPage {
    fn render_items(&mut self, listing: &CartListing) -> Result<(), RenderError> {
        self.listing = listing.clone();
        self.render_listing()?;

        self.rows = listing
            .rows()
            .iter()
            .map(|row| Ok((row.id.clone(), self.render_row(row)?)))
            .collect::<Result<_, RenderError>>()?;
        self.full_renders += 1;
        Ok(())
    }

    fn update_counter(&mut self, badge: &CounterBadge) -> Result<(), RenderError> {
        self.counter = CartCountTemplate { badge }.render()?;
        Ok(())
    }

    fn update_summary(&mut self, summary: &OrderSummary) -> Result<(), RenderError> {
        self.summary = CartSummaryTemplate { summary }.render()?;
        Ok(())
    }

    fn patch_row(&mut self, row: &CartRow) -> Result<(), RenderError> {
        let html = self.render_row(row)?;
        match self.rows.iter_mut().find(|(id, _)| *id == row.id) {
            Some((_, existing)) => *existing = html,
            None => {
                tracing::debug!(product_id = %row.id, "Patched row is not on the page");
                return Ok(());
            }
        }

        if let CartListing::Items { rows } = &mut self.listing
            && let Some(existing) = rows.iter_mut().find(|r| r.id == row.id)
        {
            existing.clone_from(row);
        }
        self.render_listing()?;
        self.row_patches += 1;
        Ok(())
    }

    fn confirm_removal(&mut self, _entry: &CartEntry) -> bool {
        self.confirm_removals
    }
}

impl Default for HtmlPage {
    fn default() -> Self {
        Self::new(&Locale::RU)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use storecart_core::{Cart, Price, Quantity};

    use super::*;
    use crate::render::CartRenderer;

    fn entry(id: &str, title: &str, price: u64, quantity: u32) -> CartEntry {
        CartEntry::new(
            ProductId::parse(id).unwrap(),
            title,
            Price::new(price),
            Quantity::new(quantity).unwrap(),
        )
    }

    #[test]
    fn test_render_items_rows() {
        let cart = Cart::from_entries([entry("P1", "Подушка", 1000, 1), entry("P2", "Плед", 750, 2)]);
        let mut page = HtmlPage::default();

        page.render_items(&CartRenderer::default().listing(&cart)).unwrap();

        assert_eq!(page.row_count(), 2);
        assert!(page.items_html().contains("data-item-id=\"P1\""));
        assert!(page.items_html().contains("Подушка"));
        assert!(page.items_html().contains("1\u{a0}500 ₽"));
        assert!(!page.items_html().contains("id=\"checkout-btn\" class=\"checkout-btn\" hidden"));
        assert!(page.row_html(&ProductId::parse("P2").unwrap()).unwrap().contains("value=\"2\""));
    }

    #[test]
    fn test_render_empty_cart() {
        let mut page = HtmlPage::default();
        page.render_items(&CartRenderer::default().listing(&Cart::new())).unwrap();

        assert_eq!(page.row_count(), 0);
        assert!(page.items_html().contains("Ваша корзина пуста"));
        assert!(page.items_html().contains("class=\"checkout-btn\" hidden"));
        assert!(page.items_html().contains("class=\"cart-wrapper\" hidden"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let cart = Cart::from_entries([entry("P1", "X", 1000, 3)]);
        let listing = CartRenderer::default().listing(&cart);
        let mut page = HtmlPage::default();

        page.render_items(&listing).unwrap();
        let first = page.items_html().to_string();
        page.render_items(&listing).unwrap();

        assert_eq!(page.items_html(), first);
        assert_eq!(page.full_renders(), 2);
    }

    #[test]
    fn test_titles_are_escaped() {
        let cart = Cart::from_entries([entry("P1", "<script>alert(1)</script>", 1, 1)]);
        let mut page = HtmlPage::default();
        page.render_items(&CartRenderer::default().listing(&cart)).unwrap();

        assert!(!page.items_html().contains("<script>"));
        assert!(page.items_html().contains("&lt;script&gt;"));
    }

    #[test]
    fn test_counter_fragment() {
        let renderer = CartRenderer::default();
        let mut page = HtmlPage::default();

        let cart = Cart::from_entries([entry("P1", "X", 1000, 3)]);
        page.update_counter(&renderer.counter(cart.totals())).unwrap();
        assert!(page.counter_html().contains("cart-counter active"));
        assert!(page.counter_html().contains(">3<"));

        page.update_counter(&renderer.counter(Cart::new().totals())).unwrap();
        assert!(!page.counter_html().contains("active"));
    }

    #[test]
    fn test_summary_fragment() {
        let cart = Cart::from_entries([entry("P1", "X", 1000, 3)]);
        let mut page = HtmlPage::default();
        page.update_summary(&CartRenderer::default().summary(cart.totals())).unwrap();

        assert!(page.summary_html().contains("Товары (3 шт.)"));
        assert!(page.summary_html().contains("3\u{a0}000 ₽"));
    }

    #[test]
    fn test_patch_row_replaces_only_that_row() {
        let renderer = CartRenderer::default();
        let cart = Cart::from_entries([entry("P1", "X", 100, 1), entry("P2", "Y", 750, 2)]);
        let mut page = HtmlPage::default();
        page.render_items(&renderer.listing(&cart)).unwrap();
        let p1_before = page.row_html(&ProductId::parse("P1").unwrap()).unwrap().to_string();

        let mut row = renderer.row(cart.entries().get(1).unwrap());
        renderer.patch_row(&mut row, Quantity::new(5).unwrap());
        page.patch_row(&row).unwrap();

        let p2 = page.row_html(&ProductId::parse("P2").unwrap()).unwrap();
        assert!(p2.contains("3\u{a0}750 ₽"));
        assert_eq!(page.row_html(&ProductId::parse("P1").unwrap()).unwrap(), p1_before);
        assert_eq!(page.row_patches(), 1);
        assert_eq!(page.full_renders(), 1);
    }

    #[test]
    fn test_patch_row_refreshes_item_list() {
        let renderer = CartRenderer::default();
        let cart = Cart::from_entries([entry("P1", "X", 100, 1), entry("P2", "Y", 750, 2)]);
        let mut page = HtmlPage::default();
        page.render_items(&renderer.listing(&cart)).unwrap();
        assert!(page.items_html().contains("1\u{a0}500 ₽"));

        let mut row = renderer.row(cart.entries().get(1).unwrap());
        renderer.patch_row(&mut row, Quantity::new(5).unwrap());
        page.patch_row(&row).unwrap();

        let items = page.items_html();
        assert!(items.contains("3\u{a0}750 ₽"));
        assert!(!items.contains("1\u{a0}500 ₽"));
        assert!(items.contains("data-item-id=\"P1\""));
        assert!(items.contains("100 ₽"));
        assert_eq!(page.full_renders(), 1);
    }

    #[test]
    fn test_toast_lifecycle_in_tree() {
        let mut page = HtmlPage::default();
        let event = |phase| ToastEvent {
            id: ToastId(1),
            message: "Готово".to_string(),
            phase,
        };

        page.apply_toast(&event(ToastPhase::Showing)).unwrap();
        assert_eq!(page.toasts().len(), 1);
        assert!(!page.toasts().first().unwrap().1.contains(" show"));

        page.apply_toast(&event(ToastPhase::Visible)).unwrap();
        assert!(page.toasts().first().unwrap().1.contains("cart-notification show"));

        page.apply_toast(&event(ToastPhase::Hiding)).unwrap();
        assert!(!page.toasts().first().unwrap().1.contains(" show"));

        page.apply_toast(&event(ToastPhase::Removed)).unwrap();
        assert!(page.toasts().is_empty());
    }

    #[test]
    fn test_confirm_removal_setting() {
        let mut page = HtmlPage::default();
        let line = entry("P1", "X", 1, 1);
        assert!(page.confirm_removal(&line));

        page.set_confirm_removals(false);
        assert!(!page.confirm_removal(&line));
    }
}
