//! Cart line types.

use serde::{Deserialize, Serialize};

use home_of_suits_core::{Money, ProductId};

use super::product::Product;

/// Identity of a cart line: one product in one size and one color.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CartLineKey {
    pub product_id: ProductId,
    pub size: String,
    pub color: String,
}

impl CartLineKey {
    #[must_use]
    pub fn new(product_id: ProductId, size: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            product_id,
            size: size.into(),
            color: color.into(),
        }
    }
}

impl std::fmt::Display for CartLineKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.product_id, self.size, self.color)
    }
}

/// A product in the cart with its chosen variant and quantity.
///
/// The product fields are flattened into the line when serialized, so a
/// stored order item reads like the product with three extra fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    /// Always at least 1.
    pub quantity: u32,
    pub selected_size: String,
    pub selected_color: String,
}

impl CartLine {
    /// A fresh line holding one unit.
    #[must_use]
    pub fn new(product: Product, size: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            product,
            quantity: 1,
            selected_size: size.into(),
            selected_color: color.into(),
        }
    }

    /// This line's identity.
    #[must_use]
    pub fn key(&self) -> CartLineKey {
        CartLineKey::new(
            self.product.id,
            self.selected_size.clone(),
            self.selected_color.clone(),
        )
    }

    /// Whether this line has the given identity.
    #[must_use]
    pub fn matches(&self, key: &CartLineKey) -> bool {
        self.product.id == key.product_id
            && self.selected_size == key.size
            && self.selected_color == key.color
    }

    /// Unit price times quantity.
    #[must_use]
    pub const fn line_total(&self) -> Money {
        self.product.price.times(self.quantity)
    }
}
