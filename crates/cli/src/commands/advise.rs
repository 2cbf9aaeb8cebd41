//! Ask the AI stylist.

use home_of_suits_core::ProductId;
use home_of_suits_storefront::{Result, Storefront};

/// Print the stylist's answer to `question` about a product.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown product.
pub async fn run(store: &Storefront, product_id: ProductId, question: &str) -> Result<()> {
    let product = store.product(product_id)?;
    println!("Asking about {}...", product.name);

    let answer = store.advise(product_id, question).await?;
    if answer.is_empty() {
        println!("Please ask a question.");
    } else {
        println!();
        println!("{answer}");
    }
    Ok(())
}
