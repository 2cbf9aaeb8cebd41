//! Order types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use home_of_suits_core::{Email, Money, OrderId, OrderStatus};

use super::cart::CartLine;

/// Who the order ships to, copied from the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSnapshot {
    /// "First Last".
    pub name: String,
    pub email: Email,
    /// "street, city".
    pub address: String,
}

/// A placed order. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// `#` followed by four digits.
    pub id: OrderId,
    pub items: Vec<CartLine>,
    /// Subtotal plus shipping.
    pub total: Money,
    pub status: OrderStatus,
    pub date: NaiveDate,
    pub customer: CustomerSnapshot,
}

impl Order {
    /// Number of units across all items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }
}
