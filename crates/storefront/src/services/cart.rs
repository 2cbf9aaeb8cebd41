//! Cart engine.
//!
//! The cart is anonymous process state: it belongs to neither the catalog
//! nor the signed-in user, and logging in or out leaves it untouched.
//!
//! Lines are identified by (product id, size, color). Adding an existing
//! variant merges into its line. Quantities never drop below 1; a
//! decrement that would do so is refused and the line keeps its quantity.
//!
//! Two families of mutators exist. `remove` and `update_quantity` act on
//! every line of a product, whatever the variant. `remove_line` and
//! `update_line_quantity` act on exactly one line.

use thiserror::Error;

use home_of_suits_core::{Money, ProductId};

use crate::error::ValidationError;
use crate::models::{CartLine, CartLineKey, Product};

/// Subtotals strictly above this ship free.
pub const FREE_SHIPPING_THRESHOLD: Money = Money::new(50_000);

/// Flat shipping fee below the threshold.
pub const FLAT_SHIPPING_FEE: Money = Money::new(1_500);

/// Errors from variant-exact cart operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// No line has this key.
    #[error("no cart line for {0}")]
    LineNotFound(CartLineKey),

    /// The change would leave the line with fewer than one unit.
    #[error("quantity cannot go below 1 (currently {current}, change {delta})")]
    QuantityBelowOne { current: u32, delta: i32 },
}

/// Shipping fee for a subtotal.
#[must_use]
pub fn shipping_fee(subtotal: Money) -> Money {
    if subtotal > FREE_SHIPPING_THRESHOLD {
        Money::ZERO
    } else {
        FLAT_SHIPPING_FEE
    }
}

/// Subtotal, shipping and total computed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct CartTotals {
    pub subtotal: Money,
    pub shipping: Money,
    pub total: Money,
}

impl CartTotals {
    /// Totals for a set of lines.
    #[must_use]
    pub fn of(lines: &[CartLine]) -> Self {
        let subtotal: Money = lines.iter().map(CartLine::line_total).sum();
        let shipping = shipping_fee(subtotal);
        Self {
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }

    /// Whether shipping is free.
    #[must_use]
    pub const fn ships_free(&self) -> bool {
        self.shipping.is_zero()
    }
}

/// Apply a signed change to a quantity, refusing results below 1.
fn adjusted(current: u32, delta: i32) -> Option<u32> {
    let next = i64::from(current) + i64::from(delta);
    if next < 1 {
        return None;
    }
    u32::try_from(next).ok()
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Look up a line by key.
    #[must_use]
    pub fn line(&self, key: &CartLineKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.matches(key))
    }

    /// Add one unit of a product variant.
    ///
    /// Merges into the existing line for the same variant, otherwise
    /// appends a new line. Size and color are taken as given.
    pub fn add(&mut self, product: &Product, size: &str, color: &str) {
        let key = CartLineKey::new(product.id, size, color);
        if let Some(line) = self.lines.iter_mut().find(|line| line.matches(&key)) {
            line.quantity = line.quantity.saturating_add(1);
            tracing::debug!(line = %key, quantity = line.quantity, "Merged into cart line");
        } else {
            self.lines.push(CartLine::new(product.clone(), size, color));
            tracing::debug!(line = %key, "Added cart line");
        }
    }

    /// Add one unit after checking the chosen variant.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if size or color is missing, or not one
    /// the product offers. The cart is unchanged on error.
    pub fn add_selection(
        &mut self,
        product: &Product,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Result<(), ValidationError> {
        let size = size
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ValidationError::MissingSize)?;
        let color = color
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or(ValidationError::MissingColor)?;

        if !product.offers_size(size) {
            return Err(ValidationError::UnknownSize {
                product_id: product.id,
                size: size.to_string(),
            });
        }
        if !product.offers_color(color) {
            return Err(ValidationError::UnknownColor {
                product_id: product.id,
                color: color.to_string(),
            });
        }

        self.add(product, size, color);
        Ok(())
    }

    /// Remove every line of a product, whatever the variant.
    pub fn remove(&mut self, product_id: ProductId) {
        self.lines.retain(|line| line.product.id != product_id);
    }

    /// Apply `delta` to every line of a product.
    ///
    /// Each line is judged on its own: one whose result would fall below 1
    /// keeps its quantity while the others change.
    pub fn update_quantity(&mut self, product_id: ProductId, delta: i32) {
        for line in self
            .lines
            .iter_mut()
            .filter(|line| line.product.id == product_id)
        {
            if let Some(next) = adjusted(line.quantity, delta) {
                line.quantity = next;
            }
        }
    }

    /// Remove exactly one line.
    ///
    /// Returns the removed line, or `None` if no line has this key.
    pub fn remove_line(&mut self, key: &CartLineKey) -> Option<CartLine> {
        let index = self.lines.iter().position(|line| line.matches(key))?;
        Some(self.lines.remove(index))
    }

    /// Apply `delta` to exactly one line and return its new quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` for an unknown key and
    /// `CartError::QuantityBelowOne` if the result would be below 1 (the
    /// line is left as it was).
    pub fn update_line_quantity(&mut self, key: &CartLineKey, delta: i32) -> Result<u32, CartError> {
        let line = self
            .lines
            .iter_mut()
            .find(|line| line.matches(key))
            .ok_or_else(|| CartError::LineNotFound(key.clone()))?;

        let next = adjusted(line.quantity, delta).ok_or(CartError::QuantityBelowOne {
            current: line.quantity,
            delta,
        })?;
        line.quantity = next;
        Ok(next)
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total units across all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Sum of price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Subtotal plus shipping.
    #[must_use]
    pub fn total(&self) -> Money {
        self.totals().total
    }

    /// Subtotal, shipping and total in one pass.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals::of(&self.lines)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use home_of_suits_core::Category;

    use super::*;
    use crate::catalog::Catalog;

    fn product(id: u32, price: u64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Suit {id}"),
            price: Money::new(price),
            category: Category::Business,
            image: String::new(),
            description: String::new(),
            features: Vec::new(),
            sizes: vec!["40R".to_string(), "42R".to_string()],
            colors: vec!["Navy".to_string(), "Black".to_string()],
            rating: 4.5,
            reviews: 1,
        }
    }

    #[test]
    fn test_adding_the_same_variant_merges() {
        let p = product(1, 38_500);
        let mut cart = Cart::new();
        cart.add(&p, "40R", "Navy");
        cart.add(&p, "40R", "Navy");

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.count(), 2);
    }

    #[test]
    fn test_different_variants_get_separate_lines() {
        let p = product(1, 38_500);
        let mut cart = Cart::new();
        cart.add(&p, "40R", "Navy");
        cart.add(&p, "42R", "Navy");
        cart.add(&p, "40R", "Black");

        assert_eq!(cart.line_count(), 3);
        assert_eq!(cart.count(), 3);
    }

    #[test]
    fn test_decrement_to_zero_is_refused() {
        let p = product(1, 38_500);
        let mut cart = Cart::new();
        cart.add(&p, "40R", "Navy");

        cart.update_quantity(p.id, -1);
        assert_eq!(cart.lines()[0].quantity, 1);

        cart.update_quantity(p.id, -5);
        assert_eq!(cart.lines()[0].quantity, 1);

        cart.update_quantity(p.id, 2);
        assert_eq!(cart.lines()[0].quantity, 3);
    }

    #[test]
    fn test_coarse_update_touches_every_variant() {
        let p = product(1, 1_000);
        let mut cart = Cart::new();
        cart.add(&p, "40R", "Navy");
        cart.add(&p, "42R", "Navy");
        cart.add(&p, "42R", "Navy");

        cart.update_quantity(p.id, -1);

        // 40R stays at 1, 42R drops from 2 to 1
        let quantities: Vec<u32> = cart.lines().iter().map(|l| l.quantity).collect();
        assert_eq!(quantities, vec![1, 1]);
    }

    #[test]
    fn test_coarse_remove_drops_every_variant() {
        let a = product(1, 1_000);
        let b = product(2, 2_000);
        let mut cart = Cart::new();
        cart.add(&a, "40R", "Navy");
        cart.add(&a, "42R", "Black");
        cart.add(&b, "40R", "Navy");

        cart.remove(a.id);

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].product.id, b.id);
    }

    #[test]
    fn test_variant_exact_operations() {
        let p = product(1, 1_000);
        let mut cart = Cart::new();
        cart.add(&p, "40R", "Navy");
        cart.add(&p, "42R", "Navy");

        let key = CartLineKey::new(p.id, "42R", "Navy");
        assert_eq!(cart.update_line_quantity(&key, 3), Ok(4));
        assert_eq!(
            cart.update_line_quantity(&key, -4),
            Err(CartError::QuantityBelowOne {
                current: 4,
                delta: -4
            })
        );
        assert_eq!(cart.line(&key).unwrap().quantity, 4);

        let removed = cart.remove_line(&key).unwrap();
        assert_eq!(removed.selected_size, "42R");
        assert_eq!(cart.line_count(), 1);
        assert!(cart.remove_line(&key).is_none());
        assert_eq!(
            cart.update_line_quantity(&key, 1),
            Err(CartError::LineNotFound(key))
        );
    }

    #[test]
    fn test_add_selection_validates_variant() {
        let p = product(1, 1_000);
        let mut cart = Cart::new();

        assert_eq!(
            cart.add_selection(&p, None, Some("Navy")),
            Err(ValidationError::MissingSize)
        );
        assert_eq!(
            cart.add_selection(&p, Some("40R"), Some("  ")),
            Err(ValidationError::MissingColor)
        );
        assert!(matches!(
            cart.add_selection(&p, Some("50L"), Some("Navy")),
            Err(ValidationError::UnknownSize { .. })
        ));
        assert!(matches!(
            cart.add_selection(&p, Some("40R"), Some("Orange")),
            Err(ValidationError::UnknownColor { .. })
        ));
        assert!(cart.is_empty());

        cart.add_selection(&p, Some("40R"), Some("Navy")).unwrap();
        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn test_totals_below_threshold_add_flat_shipping() {
        let mut cart = Cart::new();
        cart.add(&product(1, 38_500), "40R", "Navy");

        let totals = cart.totals();
        assert_eq!(totals.subtotal, Money::new(38_500));
        assert_eq!(totals.shipping, Money::new(1_500));
        assert_eq!(totals.total, Money::new(40_000));
        assert!(!totals.ships_free());
    }

    #[test]
    fn test_shipping_threshold_is_strict() {
        assert_eq!(shipping_fee(Money::new(50_000)), Money::new(1_500));
        assert_eq!(shipping_fee(Money::new(50_001)), Money::ZERO);
        assert_eq!(shipping_fee(Money::ZERO), Money::new(1_500));
    }

    #[test]
    fn test_totals_above_threshold_ship_free() {
        let mut cart = Cart::new();
        cart.add(&product(1, 26_000), "40R", "Navy");
        cart.add(&product(1, 26_000), "40R", "Navy");

        assert_eq!(cart.subtotal(), Money::new(52_000));
        assert_eq!(cart.total(), Money::new(52_000));
    }

    #[test]
    fn test_clear_resets_count_and_subtotal() {
        let catalog = Catalog::seeded();
        let mut cart = Cart::new();
        for p in catalog.products() {
            cart.add(p, &p.sizes[0], &p.colors[0]);
        }
        assert_eq!(cart.count(), 6);

        cart.clear();
        assert_eq!(cart.count(), 0);
        assert_eq!(cart.subtotal(), Money::ZERO);
        assert!(cart.is_empty());
    }
}
