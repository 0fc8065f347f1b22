//! Locale display policy for prices, counts and cart messages.
//!
//! Only the numbers are business logic; how they are grouped, which glyph
//! follows them and the wording around them is swappable per locale.

use std::fmt;
use std::str::FromStr;

use storecart_core::Price;

/// Where the currency glyph goes relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPosition {
    /// `$1,000`
    Before,
    /// `1 000 ₽`
    After,
}

/// Supported display locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocaleId {
    #[default]
    Ru,
    En,
}

impl LocaleId {
    /// The display policy for this locale.
    #[must_use]
    pub const fn locale(self) -> &'static Locale {
        match self {
            Self::Ru => &Locale::RU,
            Self::En => &Locale::EN,
        }
    }
}

impl FromStr for LocaleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ru" | "ru-ru" => Ok(Self::Ru),
            "en" | "en-us" => Ok(Self::En),
            other => Err(format!("unknown locale '{other}' (expected ru or en)")),
        }
    }
}

impl fmt::Display for LocaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ru => "ru",
            Self::En => "en",
        })
    }
}

/// Display policy for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    /// Thousands group separator.
    pub group_separator: char,
    /// Currency glyph.
    pub currency_symbol: &'static str,
    /// Placement of the currency glyph.
    pub symbol_position: SymbolPosition,
    /// Summary phrase; `{count}` is replaced by the item count.
    pub item_count_template: &'static str,
    /// Label shown before the product id on a cart row.
    pub article_label: &'static str,
    /// Tooltip of the remove button.
    pub remove_label: &'static str,
    /// Image used when an entry has none.
    pub placeholder_image: &'static str,
    /// Text of the empty-cart panel.
    pub empty_cart_message: &'static str,
    /// Notification shown after an item is added.
    pub added_message: &'static str,
    /// Caption of the checkout action.
    pub checkout_label: &'static str,
    /// Message shown when checkout is attempted on an empty cart.
    pub checkout_empty_message: &'static str,
    /// Message shown when checkout proceeds.
    pub checkout_message: &'static str,
}

impl Locale {
    /// Russian storefront, rouble prices.
    pub const RU: Self = Self {
        group_separator: '\u{a0}',
        currency_symbol: "₽",
        symbol_position: SymbolPosition::After,
        item_count_template: "Товары ({count} шт.)",
        article_label: "Артикул",
        remove_label: "Удалить",
        placeholder_image: "https://via.placeholder.com/150/4a5568/ffffff?text=Товар",
        empty_cart_message: "Ваша корзина пуста",
        added_message: "Товар добавлен в корзину!",
        checkout_label: "Оформить заказ",
        checkout_empty_message: "Корзина пуста. Добавьте товары перед оформлением заказа.",
        checkout_message: "Переход к оформлению заказа.",
    };

    /// English storefront, dollar prices.
    pub const EN: Self = Self {
        group_separator: ',',
        currency_symbol: "$",
        symbol_position: SymbolPosition::Before,
        item_count_template: "Items ({count} pcs.)",
        article_label: "SKU",
        remove_label: "Remove",
        placeholder_image: "https://via.placeholder.com/150/4a5568/ffffff?text=Product",
        empty_cart_message: "Your cart is empty",
        added_message: "Added to cart!",
        checkout_label: "Checkout",
        checkout_empty_message: "Your cart is empty. Add products before checking out.",
        checkout_message: "Proceeding to checkout.",
    };

    /// Group an integer in thousands.
    #[must_use]
    pub fn format_number(&self, value: u64) -> String {
        let digits = value.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 * 2);

        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(self.group_separator);
            }
            out.push(c);
        }
        out
    }

    /// Format a price with grouping and the currency glyph.
    #[must_use]
    pub fn format_price(&self, price: Price) -> String {
        let amount = self.format_number(price.amount());
        match self.symbol_position {
            SymbolPosition::Before => format!("{}{amount}", self.currency_symbol),
            SymbolPosition::After => format!("{amount} {}", self.currency_symbol),
        }
    }

    /// The summary phrase for an item count.
    #[must_use]
    pub fn item_count_phrase(&self, count: u64) -> String {
        self.item_count_template
            .replace("{count}", &self.format_number(count))
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::RU
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_groups_thousands() {
        let ru = &Locale::RU;
        assert_eq!(ru.format_number(0), "0");
        assert_eq!(ru.format_number(999), "999");
        assert_eq!(ru.format_number(1000), "1\u{a0}000");
        assert_eq!(ru.format_number(1_234_567), "1\u{a0}234\u{a0}567");

        assert_eq!(Locale::EN.format_number(3000), "3,000");
    }

    #[test]
    fn test_format_price_ru() {
        assert_eq!(Locale::RU.format_price(Price::new(3750)), "3\u{a0}750 ₽");
        assert_eq!(Locale::RU.format_price(Price::ZERO), "0 ₽");
    }

    #[test]
    fn test_format_price_en() {
        assert_eq!(Locale::EN.format_price(Price::new(1_000_000)), "$1,000,000");
    }

    #[test]
    fn test_item_count_phrase() {
        assert_eq!(Locale::RU.item_count_phrase(3), "Товары (3 шт.)");
        assert_eq!(Locale::EN.item_count_phrase(1200), "Items (1,200 pcs.)");
    }

    #[test]
    fn test_locale_id_from_str() {
        assert_eq!("RU".parse::<LocaleId>(), Ok(LocaleId::Ru));
        assert_eq!("en-US".parse::<LocaleId>(), Ok(LocaleId::En));
        assert!("fr".parse::<LocaleId>().is_err());
    }
}
