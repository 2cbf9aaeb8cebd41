//! In-memory product catalog.
//!
//! The catalog is built once at startup from the seed list below and is
//! read-only afterwards. Browsing filters and sorts a borrowed view; it
//! never reorders the catalog itself.

use std::str::FromStr;

use home_of_suits_core::{Category, Money, ProductId};

use crate::models::{Product, Testimonial};

/// Category filter for [`Catalog::browse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    fn admits(self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => product.category == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// Sort order for [`Catalog::browse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Featured,
    PriceLowToHigh,
    PriceHighToLow,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "featured" | "default" => Ok(Self::Featured),
            "low" | "price-low" | "low-high" => Ok(Self::PriceLowToHigh),
            "high" | "price-high" | "high-low" => Ok(Self::PriceHighToLow),
            _ => Err(format!("invalid sort order: {s}")),
        }
    }
}

/// The product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    testimonials: Vec<Testimonial>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seeded()
    }
}

impl Catalog {
    /// Build a catalog from an explicit product list.
    #[must_use]
    pub const fn new(products: Vec<Product>, testimonials: Vec<Testimonial>) -> Self {
        Self {
            products,
            testimonials,
        }
    }

    /// The Home of Suits launch collection.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(seed_products(), seed_testimonials())
    }

    /// Every product, in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Filter and sort for the shop page.
    ///
    /// Sorting is stable, so equal prices keep catalog order.
    #[must_use]
    pub fn browse(&self, filter: CategoryFilter, sort: SortOrder) -> Vec<&Product> {
        let mut view: Vec<&Product> = self.products.iter().filter(|p| filter.admits(p)).collect();
        match sort {
            SortOrder::Featured => {}
            SortOrder::PriceLowToHigh => view.sort_by_key(|p| p.price),
            SortOrder::PriceHighToLow => view.sort_by_key(|p| std::cmp::Reverse(p.price)),
        }
        view
    }

    /// Categories offered in the shop sidebar, in display order.
    #[must_use]
    pub const fn categories(&self) -> [Category; 5] {
        Category::ALL
    }

    /// Customer reviews for the home page.
    #[must_use]
    pub fn testimonials(&self) -> &[Testimonial] {
        &self.testimonials
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: u32,
    name: &str,
    price: u64,
    category: Category,
    image: &str,
    description: &str,
    features: &[&str],
    sizes: &[&str],
    colors: &[&str],
    rating: f32,
    reviews: u32,
) -> Product {
    let owned = |items: &[&str]| -> Vec<String> { items.iter().map(|s| (*s).to_string()).collect() };
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price: Money::new(price),
        category,
        image: image.to_string(),
        description: description.to_string(),
        features: owned(features),
        sizes: owned(sizes),
        colors: owned(colors),
        rating,
        reviews,
    }
}

fn seed_products() -> Vec<Product> {
    vec![
        product(
            1,
            "The Royal Navy Slim Fit",
            38_500,
            Category::Business,
            "/suit1.jpg",
            "A classic navy suit tailored for the modern professional. Crafted from breathable Italian wool, this suit offers both comfort and commanding presence.",
            &["100% Italian Wool", "Slim Fit Cut", "Double Vent", "Notch Lapel"],
            &["38R", "40R", "42R", "44R", "46L"],
            &["Navy Blue", "Charcoal"],
            4.8,
            124,
        ),
        product(
            2,
            "Charcoal Executive Series",
            45_000,
            Category::Business,
            "/suit2.jpg",
            "The definitive power suit. The charcoal hue exudes authority, while the silk lining ensures all-day comfort during high-stakes meetings.",
            &["Merino Wool Blend", "Modern Fit", "Single Breasted", "Wrinkle Resistant"],
            &["38R", "40R", "42R", "44L"],
            &["Charcoal Grey", "Black"],
            4.9,
            89,
        ),
        product(
            3,
            "Tuxedo Royale Black",
            78_000,
            Category::Wedding,
            "/suit3.jpeg",
            "For the moments that matter. This satin-lapel tuxedo is the epitome of evening elegance.",
            &["Premium Wool", "Satin Peak Lapel", "Tailored Fit", "Matching Bowtie Included"],
            &["38R", "40R", "42R", "44R"],
            &["Black", "Midnight Blue"],
            5.0,
            45,
        ),
        product(
            4,
            "The Havana Linen Beige",
            32_500,
            Category::Casual,
            "/suit4.jpeg",
            "Perfect for summer weddings or garden parties. Lightweight linen keeps you cool while looking effortlessly sharp.",
            &["100% Linen", "Unstructured Jacket", "Patch Pockets", "Breathable"],
            &["38R", "40R", "42R", "44R"],
            &["Beige", "Light Blue"],
            4.6,
            67,
        ),
        product(
            5,
            "Double Breasted Pinstripe",
            54_600,
            Category::Vintage,
            "/suit5.jpeg",
            "A nod to the roaring twenties. This bold pinstripe suit makes a statement wherever you go.",
            &["Wool Flannel", "Peak Lapel", "Double Breasted", "High-Waisted Trousers"],
            &["40R", "42R", "44R"],
            &["Navy Pinstripe", "Grey Pinstripe"],
            4.7,
            32,
        ),
        product(
            6,
            "Velvet Dinner Jacket",
            49_400,
            Category::Evening,
            "/suit6.jpeg",
            "Luxurious velvet jacket paired with classic black trousers. Stand out at the gala.",
            &["Cotton Velvet", "Shawl Collar", "Slim Fit", "Trousers Included"],
            &["38R", "40R", "42R"],
            &["Burgundy", "Deep Green", "Black"],
            4.9,
            15,
        ),
    ]
}

fn seed_testimonials() -> Vec<Testimonial> {
    let review = |id, user: &str, text: &str, rating| Testimonial {
        id,
        user: user.to_string(),
        text: text.to_string(),
        rating,
    };
    vec![
        review(
            1,
            "James O.",
            "The quality of the fabric is unmatched. Delivery to Nairobi was surprisingly fast.",
            5,
        ),
        review(
            2,
            "Michael K.",
            "Bought the Tuxedo for my wedding. Fits like a glove. Highly recommend.",
            5,
        ),
        review(
            3,
            "David W.",
            "Great customer service. Helped me pick the right size.",
            4,
        ),
    ]
}
