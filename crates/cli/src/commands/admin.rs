//! Admin dashboard commands.

use home_of_suits_storefront::services::admin::Dashboard;
use home_of_suits_storefront::{Result, Storefront};

/// Sign in as an administrator.
///
/// # Errors
///
/// Returns `AppError::Admin(AccessDenied)` for a customer account, which is
/// signed out again.
pub async fn login(store: &mut Storefront, email: &str, password: &str) -> Result<()> {
    let admin = store.admin_login(email, password).await?;
    println!("Signed in to the admin area as {}.", admin.name);
    Ok(())
}

/// Print the dashboard.
///
/// # Errors
///
/// Returns `AppError::Admin` unless an administrator is signed in.
pub fn dashboard(store: &Storefront) -> Result<()> {
    let dashboard = store.dashboard()?;
    print_dashboard(&dashboard);
    Ok(())
}

fn print_dashboard(dashboard: &Dashboard) {
    let stats = &dashboard.stats;
    println!("Total revenue:  {}", stats.total_revenue);
    println!("Total orders:   {}", stats.total_orders);
    println!("New customers:  {}", stats.new_customers);
    println!("Products:       {}", stats.product_count);

    println!();
    println!("Sales this week ({}):", dashboard.weekly_total());
    for day in &dashboard.weekly_sales {
        println!("  {}  {:>14}", day.day, day.sales.to_string());
    }

    println!();
    println!("Inventory:");
    for row in &dashboard.inventory {
        println!(
            "  {:>3}  {:<28} {:<9} {:>12}  {:.1}",
            row.id.as_u32(),
            row.name,
            row.category.as_str(),
            row.price.to_string(),
            row.rating
        );
    }
}
