//! The checkout command.

use std::str::FromStr;

use clap::Args;
use home_of_suits_core::{AddressId, PaymentMethod, ProductId};
use home_of_suits_storefront::models::CartLineKey;
use home_of_suits_storefront::services::checkout::{CheckoutForm, Receipt};
use home_of_suits_storefront::state::{QUICK_ADD_COLOR, QUICK_ADD_SIZE};
use home_of_suits_storefront::{AppError, Result, Storefront};
use thiserror::Error;

/// Errors parsing an `--item` argument.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemSpecError {
    #[error("expected <id> or <id>:<size>:<color>[:qty], got {0:?}")]
    Malformed(String),

    #[error("invalid product id {0:?}")]
    InvalidProductId(String),

    #[error("quantity must be a positive whole number, got {0:?}")]
    InvalidQuantity(String),
}

/// One `--item` argument: a product, optionally in a size and color, with a
/// quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub product_id: ProductId,
    /// `(size, color)`; `None` quick-adds the default variant.
    pub variant: Option<(String, String)>,
    pub quantity: u32,
}

impl ItemSpec {
    /// Parse `<id>` or `<id>:<size>:<color>[:qty]`.
    ///
    /// # Errors
    ///
    /// Returns an error for a missing part, a non-numeric id or a quantity
    /// below one.
    pub fn parse(raw: &str) -> std::result::Result<Self, ItemSpecError> {
        let parts: Vec<&str> = raw.split(':').map(str::trim).collect();
        let (id, variant, quantity) = match parts.as_slice() {
            [id] => (*id, None, None),
            [id, size, color] => (*id, Some((*size, *color)), None),
            [id, size, color, qty] => (*id, Some((*size, *color)), Some(*qty)),
            _ => return Err(ItemSpecError::Malformed(raw.to_string())),
        };
        if variant.is_some_and(|(size, color)| size.is_empty() || color.is_empty()) {
            return Err(ItemSpecError::Malformed(raw.to_string()));
        }

        let product_id = id
            .parse()
            .map_err(|_| ItemSpecError::InvalidProductId(id.to_string()))?;
        let quantity = match quantity {
            None => 1,
            Some(q) => match q.parse::<u32>() {
                Ok(n) if n >= 1 => n,
                _ => return Err(ItemSpecError::InvalidQuantity(q.to_string())),
            },
        };

        Ok(Self {
            product_id,
            variant: variant.map(|(size, color)| (size.to_string(), color.to_string())),
            quantity,
        })
    }
}

impl FromStr for ItemSpec {
    type Err = ItemSpecError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Args)]
pub struct CheckoutArgs {
    /// Item to buy as `<id>:<size>:<color>[:qty]`, or a bare `<id>` for the
    /// default variant; repeat for more
    #[arg(long = "item", required = true)]
    pub items: Vec<ItemSpec>,

    /// Fill the delivery details from a saved address
    #[arg(long)]
    pub use_address: Option<String>,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub street: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub postal_code: Option<String>,

    /// `mobile-money`, `card` or `cod`
    #[arg(long, default_value = "mobile-money")]
    pub payment: PaymentMethod,
}

impl CheckoutArgs {
    /// Start from the signed-in profile or a saved address, then apply any
    /// fields given explicitly.
    fn form(&self, store: &Storefront) -> Result<CheckoutForm> {
        let mut form = store.checkout_form();

        if let Some(id) = &self.use_address {
            let id = AddressId::new(id.as_str());
            let user = store.current_user();
            let address = user
                .and_then(|u| u.address(&id))
                .ok_or_else(|| AppError::NotFound(format!("address {id}")))?;
            form.use_address(address, user);
        }

        let overrides = [
            (&self.first_name, &mut form.first_name),
            (&self.last_name, &mut form.last_name),
            (&self.email, &mut form.email),
            (&self.phone, &mut form.phone),
            (&self.street, &mut form.street),
            (&self.city, &mut form.city),
            (&self.postal_code, &mut form.postal_code),
        ];
        for (given, field) in overrides {
            if let Some(value) = given {
                field.clone_from(value);
            }
        }
        Ok(form)
    }
}

/// Fill the cart from the `--item` arguments and place the order.
///
/// # Errors
///
/// Returns an error for an unknown product, an unavailable size or color, an
/// incomplete form, or a failed save.
pub async fn run(store: &mut Storefront, args: CheckoutArgs) -> Result<()> {
    for item in &args.items {
        let (size, color) = match &item.variant {
            Some((size, color)) => {
                store.add_to_cart(item.product_id, Some(size), Some(color))?;
                (size.as_str(), color.as_str())
            }
            None => {
                store.quick_add(item.product_id)?;
                (QUICK_ADD_SIZE, QUICK_ADD_COLOR)
            }
        };
        if item.quantity > 1 {
            let key = CartLineKey::new(item.product_id, size, color);
            let extra = i32::try_from(item.quantity - 1).unwrap_or(i32::MAX);
            store.update_line_quantity(&key, extra)?;
        }
    }

    let form = args.form(store)?;
    let receipt = store.place_order(&form, args.payment).await?;
    print_receipt(&receipt);
    Ok(())
}

fn print_receipt(receipt: &Receipt) {
    let order = &receipt.order;
    println!("Order {} confirmed ({})", order.id, order.status);
    for line in &order.items {
        println!(
            "  {} x{}  {} / {}  {}",
            line.product.name,
            line.quantity,
            line.selected_size,
            line.selected_color,
            line.line_total()
        );
    }
    println!("Subtotal: {}", receipt.totals.subtotal);
    if receipt.totals.ships_free() {
        println!("Shipping: Free");
    } else {
        println!("Shipping: {}", receipt.totals.shipping);
    }
    println!("Total:    {}", receipt.totals.total);
    println!("Payment:  {}", receipt.payment_method);
    println!("Deliver to {}, {}", order.customer.name, order.customer.address);
}
