//! User domain types.
//!
//! A `User` is persisted wholesale: addresses and order history travel
//! inside the record rather than in separate slots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use home_of_suits_core::{AddressId, Role, UserId};

use super::order::Order;

/// A signed-in shopper or administrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Login matching key, kept exactly as typed.
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Saved shipping addresses, in insertion order.
    #[serde(default)]
    pub addresses: Vec<Address>,
    /// Order history, most recent first.
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(rename = "joinedDate")]
    pub joined_at: DateTime<Utc>,
    pub role: Role,
}

impl User {
    /// Whether this user may open the admin dashboard.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Look up a saved address.
    #[must_use]
    pub fn address(&self, id: &AddressId) -> Option<&Address> {
        self.addresses.iter().find(|a| &a.id == id)
    }

    /// First and second space-separated words of the display name.
    ///
    /// Words past the second are dropped; a single-word name yields an empty
    /// last name.
    #[must_use]
    pub fn name_parts(&self) -> (&str, &str) {
        let mut words = self.name.split(' ');
        let first = words.next().unwrap_or_default();
        (first, words.next().unwrap_or_default())
    }
}

/// A saved shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    /// Short name such as "Home" or "Office".
    pub label: String,
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub phone: String,
}

/// An address as entered, before it is given an id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAddress {
    pub label: String,
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub phone: String,
}

impl NewAddress {
    /// Assign a fresh id.
    #[must_use]
    pub fn into_address(self) -> Address {
        Address {
            id: AddressId::new(format!("addr_{}", Uuid::new_v4().simple())),
            label: self.label,
            first_name: self.first_name,
            last_name: self.last_name,
            street: self.street,
            city: self.city,
            postal_code: self.postal_code,
            phone: self.phone,
        }
    }
}

/// Partial profile edit. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ProfileUpdate {
    /// Whether the update would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }

    /// Merge the given fields into `user`.
    pub fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(phone) = self.phone {
            user.phone = Some(phone);
        }
    }
}
