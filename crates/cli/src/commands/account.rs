//! Account commands: sign-in, profile, address book and order history.

use home_of_suits_core::AddressId;
use home_of_suits_storefront::models::{NewAddress, Order, ProfileUpdate, User};
use home_of_suits_storefront::{Result, Storefront};

pub async fn login(store: &mut Storefront, email: &str, password: &str) -> Result<()> {
    let user = store.login(email, password).await?;
    println!("Signed in as {} <{}>", user.name, user.email);
    Ok(())
}

pub async fn register(store: &mut Storefront, name: &str, email: &str, password: &str) -> Result<()> {
    let user = store.register(name, email, password).await?;
    println!("Welcome, {}! Your account id is {}.", user.name, user.id);
    Ok(())
}

pub fn logout(store: &mut Storefront) -> Result<()> {
    store.logout()?;
    println!("Signed out.");
    Ok(())
}

pub fn show(store: &Storefront) {
    let Some(user) = store.current_user() else {
        println!("Not signed in.");
        return;
    };
    print_profile(user);
}

/// Apply the given profile fields.
///
/// # Errors
///
/// Returns a session error if the change could not be saved.
pub fn update(
    store: &mut Storefront,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
) -> Result<()> {
    let update = ProfileUpdate { name, email, phone };
    if update.is_empty() {
        println!("Nothing to update.");
        return Ok(());
    }
    if store.current_user().is_none() {
        println!("Not signed in.");
        return Ok(());
    }

    store.update_profile(update)?;
    println!("Profile updated.");
    Ok(())
}

pub fn add_address(store: &mut Storefront, address: NewAddress) -> Result<()> {
    match store.add_address(address)? {
        Some(id) => println!("Saved address {id}."),
        None => println!("Sign in to save addresses."),
    }
    Ok(())
}

pub fn remove_address(store: &mut Storefront, id: &str) -> Result<()> {
    store.remove_address(&AddressId::new(id))?;
    println!("Removed address {id}.");
    Ok(())
}

pub fn orders(store: &Storefront) {
    if store.current_user().is_none() {
        println!("Not signed in.");
        return;
    }
    let orders = store.orders();
    if orders.is_empty() {
        println!("No orders yet.");
        return;
    }
    for order in orders {
        println!("{}", order_line(order));
    }
}

fn print_profile(user: &User) {
    println!("{} <{}>", user.name, user.email);
    println!("  id:     {}", user.id);
    println!("  role:   {}", user.role);
    if let Some(phone) = &user.phone {
        println!("  phone:  {phone}");
    }
    println!("  joined: {}", user.joined_at.format("%Y-%m-%d"));
    println!("  orders: {}", user.orders.len());

    if user.addresses.is_empty() {
        return;
    }
    println!();
    println!("Addresses:");
    for address in &user.addresses {
        println!(
            "  [{}] {}: {} {}, {}, {} {} ({})",
            address.id,
            address.label,
            address.first_name,
            address.last_name,
            address.street,
            address.city,
            address.postal_code,
            address.phone,
        );
    }
}

fn order_line(order: &Order) -> String {
    format!(
        "{}  {}  {:<10}  {} item(s)  {}",
        order.id,
        order.date,
        order.status.to_string(),
        order.item_count(),
        order.total
    )
}
