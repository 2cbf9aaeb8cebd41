//! Catalog product types.

use serde::{Deserialize, Serialize};

use home_of_suits_core::{Category, Money, ProductId};

/// A product in the catalog.
///
/// Products are defined once when the catalog is built and never mutated.
/// Cart lines and orders carry their own copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price.
    pub price: Money,
    pub category: Category,
    /// Image path relative to the asset root.
    pub image: String,
    pub description: String,
    pub features: Vec<String>,
    /// Offered sizes, in display order.
    pub sizes: Vec<String>,
    /// Offered colors, in display order.
    pub colors: Vec<String>,
    /// Average rating, 0.0 to 5.0.
    pub rating: f32,
    /// Number of reviews behind `rating`.
    pub reviews: u32,
}

impl Product {
    /// Whether `size` is one of the offered sizes.
    #[must_use]
    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }

    /// Whether `color` is one of the offered colors.
    #[must_use]
    pub fn offers_color(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c == color)
    }
}

/// A customer review shown on the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: u32,
    pub user: String,
    pub text: String,
    /// Whole stars, 1 to 5.
    pub rating: u8,
}
