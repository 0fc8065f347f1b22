//! View renderer: projects the cart into displayable view models.
//!
//! Everything here is a pure function of the cart and the locale, so
//! rendering the same cart twice yields identical views. Presentation of the
//! views (HTML, terminal, anything else) is the presenter's job.

use storecart_core::{Cart, CartEntry, CartTotals, Price, ProductId, Quantity};

use crate::format::Locale;

/// One rendered cart line.
///
/// A row always carries the id of the entry it was rendered from; direct
/// edits correlate back to the store through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRow {
    pub id: ProductId,
    pub title: String,
    /// Article line, e.g. `Артикул: P1`.
    pub article: String,
    pub image_url: String,
    pub unit_price: Price,
    pub unit_price_display: String,
    pub quantity: Quantity,
    pub line_total: Price,
    pub line_total_display: String,
}

/// The rendered item list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartListing {
    /// Nothing in the cart: show the empty panel, hide checkout.
    Empty {
        /// Text of the empty-cart panel.
        message: String,
    },
    /// At least one row: show the list and the checkout action.
    Items {
        /// Rows in cart order.
        rows: Vec<CartRow>,
    },
}

impl CartListing {
    /// The rendered rows; empty for [`CartListing::Empty`].
    #[must_use]
    pub fn rows(&self) -> &[CartRow] {
        match self {
            Self::Empty { .. } => &[],
            Self::Items { rows } => rows,
        }
    }

    /// Whether the checkout action is shown.
    #[must_use]
    pub const fn checkout_visible(&self) -> bool {
        matches!(self, Self::Items { .. })
    }
}

/// The cart counter badge in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterBadge {
    /// Item count, or empty when the cart is empty.
    pub text: String,
    /// Whether the badge is shown in its active style.
    pub active: bool,
}

/// The order summary panel and total price display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub item_count: u64,
    pub total: Price,
    /// Phrase such as `Товары (3 шт.)`.
    pub item_count_phrase: String,
    pub subtotal_display: String,
    pub total_display: String,
}

/// Builds view models for one locale.
#[derive(Debug, Clone, Copy)]
pub struct CartRenderer {
    locale: &'static Locale,
}

impl CartRenderer {
    /// Create a renderer for `locale`.
    #[must_use]
    pub const fn new(locale: &'static Locale) -> Self {
        Self { locale }
    }

    /// The locale used for formatting.
    #[must_use]
    pub const fn locale(&self) -> &'static Locale {
        self.locale
    }

    /// Render the full item list.
    #[must_use]
    pub fn listing(&self, cart: &Cart) -> CartListing {
        if cart.is_empty() {
            return CartListing::Empty {
                message: self.locale.empty_cart_message.to_string(),
            };
        }

        CartListing::Items {
            rows: cart.iter().map(|entry| self.row(entry)).collect(),
        }
    }

    /// Render one entry as a row.
    #[must_use]
    pub fn row(&self, entry: &CartEntry) -> CartRow {
        let line_total = entry.subtotal();
        CartRow {
            id: entry.id.clone(),
            title: entry.title.clone(),
            article: format!("{}: {}", self.locale.article_label, entry.id),
            image_url: entry
                .image
                .clone()
                .unwrap_or_else(|| self.locale.placeholder_image.to_string()),
            unit_price: entry.price,
            unit_price_display: self.locale.format_price(entry.price),
            quantity: entry.quantity,
            line_total,
            line_total_display: self.locale.format_price(line_total),
        }
    }

    /// Rewrite a row's quantity and subtotal from its own unit price.
    pub fn patch_row(&self, row: &mut CartRow, quantity: Quantity) {
        row.quantity = quantity;
        row.line_total = row.unit_price.times(quantity);
        row.line_total_display = self.locale.format_price(row.line_total);
    }

    /// Render the counter badge.
    #[must_use]
    pub fn counter(&self, totals: CartTotals) -> CounterBadge {
        if totals.item_count == 0 {
            CounterBadge {
                text: String::new(),
                active: false,
            }
        } else {
            CounterBadge {
                text: totals.item_count.to_string(),
                active: true,
            }
        }
    }

    /// Render the order summary.
    #[must_use]
    pub fn summary(&self, totals: CartTotals) -> OrderSummary {
        let total_display = self.locale.format_price(totals.total);
        OrderSummary {
            item_count: totals.item_count,
            total: totals.total,
            item_count_phrase: self.locale.item_count_phrase(totals.item_count),
            subtotal_display: total_display.clone(),
            total_display,
        }
    }
}

impl Default for CartRenderer {
    fn default() -> Self {
        Self::new(&Locale::RU)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entry(id: &str, price: u64, quantity: u32) -> CartEntry {
        CartEntry::new(
            ProductId::parse(id).unwrap(),
            format!("Item {id}"),
            Price::new(price),
            Quantity::new(quantity).unwrap(),
        )
    }

    #[test]
    fn test_empty_cart_renders_empty_listing() {
        let listing = CartRenderer::default().listing(&Cart::new());

        assert!(matches!(listing, CartListing::Empty { .. }));
        assert!(listing.rows().is_empty());
        assert!(!listing.checkout_visible());
    }

    #[test]
    fn test_rows_follow_cart_order() {
        let cart = Cart::from_entries([entry("B", 10, 1), entry("A", 20, 1)]);
        let listing = CartRenderer::default().listing(&cart);

        let ids: Vec<&str> = listing.rows().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["B", "A"]);
        assert!(listing.checkout_visible());
    }

    #[test]
    fn test_row_fields() {
        let row = CartRenderer::default().row(&entry("P2", 750, 2));

        assert_eq!(row.article, "Артикул: P2");
        assert_eq!(row.unit_price_display, "750 ₽");
        assert_eq!(row.line_total, Price::new(1500));
        assert_eq!(row.line_total_display, "1\u{a0}500 ₽");
        assert_eq!(row.image_url, Locale::RU.placeholder_image);
    }

    #[test]
    fn test_row_keeps_image() {
        let row = CartRenderer::default().row(&entry("P1", 1, 1).with_image("/p1.png"));
        assert_eq!(row.image_url, "/p1.png");
    }

    #[test]
    fn test_patch_row() {
        let renderer = CartRenderer::default();
        let mut row = renderer.row(&entry("P2", 750, 2));

        renderer.patch_row(&mut row, Quantity::new(5).unwrap());
        assert_eq!(row.quantity.get(), 5);
        assert_eq!(row.line_total, Price::new(3750));
        assert_eq!(row.line_total_display, "3\u{a0}750 ₽");
    }

    #[test]
    fn test_counter_badge() {
        let renderer = CartRenderer::default();

        let empty = renderer.counter(CartTotals::default());
        assert_eq!(empty.text, "");
        assert!(!empty.active);

        let badge = renderer.counter(CartTotals {
            item_count: 3,
            total: Price::new(3000),
        });
        assert_eq!(badge.text, "3");
        assert!(badge.active);
    }

    #[test]
    fn test_summary() {
        let cart = Cart::from_entries([entry("A", 500, 2), entry("B", 1499, 1)]);
        let summary = CartRenderer::default().summary(cart.totals());

        assert_eq!(summary.total, Price::new(2499));
        assert_eq!(summary.item_count_phrase, "Товары (3 шт.)");
        assert_eq!(summary.total_display, "2\u{a0}499 ₽");
        assert_eq!(summary.subtotal_display, summary.total_display);
    }

    #[test]
    fn test_listing_is_idempotent() {
        let cart = Cart::from_entries([entry("A", 500, 2)]);
        let renderer = CartRenderer::new(&Locale::EN);
        assert_eq!(renderer.listing(&cart), renderer.listing(&cart));
    }
}
