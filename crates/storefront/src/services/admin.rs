//! Admin access control and the dashboard read model.
//!
//! The dashboard figures are fixed showcase numbers; only the product count
//! and inventory rows come from the live catalog.

use serde::Serialize;
use thiserror::Error;

use home_of_suits_core::{Category, Money, ProductId};

use crate::catalog::Catalog;
use crate::models::User;

/// Why the admin area was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AdminError {
    #[error("sign in to access the admin area")]
    NotSignedIn,

    #[error("access denied: admin role required")]
    AccessDenied,
}

/// Gate in front of every admin operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminGate;

impl AdminGate {
    /// Return the user if they are a signed-in admin.
    ///
    /// # Errors
    ///
    /// `NotSignedIn` when there is no user, `AccessDenied` when the user is
    /// a customer.
    pub fn require(user: Option<&User>) -> Result<&User, AdminError> {
        let user = user.ok_or(AdminError::NotSignedIn)?;
        if !user.is_admin() {
            return Err(AdminError::AccessDenied);
        }
        Ok(user)
    }
}

/// Headline figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_revenue: Money,
    pub total_orders: u32,
    pub new_customers: u32,
    pub product_count: usize,
}

/// Revenue for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySales {
    pub day: &'static str,
    pub sales: Money,
}

/// One product line in the inventory table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryRow {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    pub price: Money,
    pub rating: f32,
}

const TOTAL_REVENUE: u64 = 2_800_000;
const TOTAL_ORDERS: u32 = 156;
const NEW_CUSTOMERS: u32 = 48;

const WEEKLY_SALES: [(&str, u64); 7] = [
    ("Mon", 450_000),
    ("Tue", 320_000),
    ("Wed", 210_000),
    ("Thu", 280_000),
    ("Fri", 190_000),
    ("Sat", 350_000),
    ("Sun", 480_000),
];

/// Everything the admin dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub weekly_sales: Vec<DailySales>,
    pub inventory: Vec<InventoryRow>,
}

impl Dashboard {
    #[must_use]
    pub fn build(catalog: &Catalog) -> Self {
        let inventory = catalog
            .products()
            .iter()
            .map(|product| InventoryRow {
                id: product.id,
                name: product.name.clone(),
                category: product.category,
                price: product.price,
                rating: product.rating,
            })
            .collect();

        Self {
            stats: DashboardStats {
                total_revenue: Money::new(TOTAL_REVENUE),
                total_orders: TOTAL_ORDERS,
                new_customers: NEW_CUSTOMERS,
                product_count: catalog.len(),
            },
            weekly_sales: WEEKLY_SALES
                .iter()
                .map(|&(day, sales)| DailySales {
                    day,
                    sales: Money::new(sales),
                })
                .collect(),
            inventory,
        }
    }

    /// Sum of the weekly series.
    #[must_use]
    pub fn weekly_total(&self) -> Money {
        self.weekly_sales.iter().map(|d| d.sales).sum()
    }
}
