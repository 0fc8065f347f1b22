//! A single cart line.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId, Quantity};

/// One product line in the cart.
///
/// The serialized field names (`id`, `title`, `price`, `quantity`, `image`)
/// are the persisted record shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Stable product identifier, unique within a cart.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Unit price in whole currency units.
    pub price: Price,
    /// Number of units, always at least 1.
    pub quantity: Quantity,
    /// Product image URL, if the page provided one.
    #[serde(default)]
    pub image: Option<String>,
}

impl CartEntry {
    /// Create a new cart entry without an image.
    #[must_use]
    pub fn new(id: ProductId, title: impl Into<String>, price: Price, quantity: Quantity) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            quantity,
            image: None,
        }
    }

    /// Attach an image URL. Blank URLs are treated as no image.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        let image = image.into();
        self.image = if image.trim().is_empty() {
            None
        } else {
            Some(image)
        };
        self
    }

    /// Line subtotal: unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(self.quantity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entry(price: u64, quantity: u32) -> CartEntry {
        CartEntry::new(
            ProductId::parse("P1").unwrap(),
            "Cushion",
            Price::new(price),
            Quantity::new(quantity).unwrap(),
        )
    }

    #[test]
    fn test_subtotal() {
        assert_eq!(entry(500, 2).subtotal(), Price::new(1000));
        assert_eq!(entry(1499, 1).subtotal(), Price::new(1499));
    }

    #[test]
    fn test_with_image_ignores_blank() {
        assert_eq!(entry(1, 1).with_image("  ").image, None);
        assert_eq!(
            entry(1, 1).with_image("/img/p1.jpg").image.as_deref(),
            Some("/img/p1.jpg")
        );
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(entry(1000, 3).with_image("/a.png")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "P1",
                "title": "Cushion",
                "price": 1000,
                "quantity": 3,
                "image": "/a.png"
            })
        );
    }

    #[test]
    fn test_deserialize_without_image() {
        let json = r#"{"id":"P1","title":"Cushion","price":10,"quantity":1}"#;
        let parsed: CartEntry = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.image, None);
    }
}
