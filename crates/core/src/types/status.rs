//! Closed enums for statuses, roles, categories and payment methods.
//!
//! Serialized names match the persisted session record, so a stored user
//! from an earlier run deserializes unchanged.

use serde::{Deserialize, Serialize};

/// Order fulfillment status.
///
/// Checkout only ever produces [`OrderStatus::Pending`]; the later states
/// exist so stored histories can carry them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Processing => write!(f, "Processing"),
            Self::Shipped => write!(f, "Shipped"),
            Self::Delivered => write!(f, "Delivered"),
        }
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May open the admin dashboard.
    Admin,
    /// Regular shopper.
    #[default]
    Customer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Customer => write!(f, "customer"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "customer" => Ok(Self::Customer),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Business,
    Wedding,
    Casual,
    Vintage,
    Evening,
}

impl Category {
    /// Every category, in storefront display order.
    pub const ALL: [Self; 5] = [
        Self::Business,
        Self::Wedding,
        Self::Casual,
        Self::Vintage,
        Self::Evening,
    ];

    /// Display name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Business => "Business",
            Self::Wedding => "Wedding",
            Self::Casual => "Casual",
            Self::Vintage => "Vintage",
            Self::Evening => "Evening",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid category: {s}"))
    }
}

/// How the shopper intends to pay.
///
/// Recorded on the checkout receipt only; no payment is ever taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    /// M-Pesa mobile money.
    #[default]
    #[serde(rename = "MPESA")]
    MobileMoney,
    #[serde(rename = "CARD")]
    Card,
    #[serde(rename = "COD")]
    CashOnDelivery,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MobileMoney => write!(f, "M-Pesa"),
            Self::Card => write!(f, "Card"),
            Self::CashOnDelivery => write!(f, "Cash on Delivery"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mobile-money" | "mpesa" | "m-pesa" => Ok(Self::MobileMoney),
            "card" => Ok(Self::Card),
            "cod" | "cash-on-delivery" => Ok(Self::CashOnDelivery),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}
