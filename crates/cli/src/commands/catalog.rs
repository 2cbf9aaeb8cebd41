//! Catalog browsing commands.

use home_of_suits_core::ProductId;
use home_of_suits_storefront::catalog::{CategoryFilter, SortOrder};
use home_of_suits_storefront::models::Product;
use home_of_suits_storefront::{Result, Storefront};

/// List products in a category, optionally sorted by price.
pub fn list(store: &Storefront, filter: CategoryFilter, sort: SortOrder) {
    let products = store.browse(filter, sort);
    if products.is_empty() {
        println!("No products found.");
        return;
    }

    for product in products {
        println!("{}", summary_line(product));
    }
}

/// Show one product in full.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown id.
pub fn show(store: &Storefront, id: ProductId) -> Result<()> {
    let product = store.product(id)?;

    println!("{} (#{})", product.name, product.id);
    println!("{} | {}", product.category, product.price);
    println!(
        "Rated {:.1}/5 from {} reviews",
        product.rating, product.reviews
    );
    println!();
    println!("{}", product.description);
    println!();
    for feature in &product.features {
        println!("  - {feature}");
    }
    println!("Sizes:  {}", product.sizes.join(", "));
    println!("Colors: {}", product.colors.join(", "));
    Ok(())
}

fn summary_line(product: &Product) -> String {
    format!(
        "{:>3}  {:<28} {:<9} {:>12}  {:.1}",
        product.id.as_u32(),
        product.name,
        product.category.as_str(),
        product.price.to_string(),
        product.rating
    )
}
