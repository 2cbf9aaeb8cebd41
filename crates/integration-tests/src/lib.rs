//! End-to-end tests for the Home of Suits storefront.
//!
//! Every scenario drives the public [`Storefront`] façade over in-memory
//! session storage, with the simulated latencies switched off unless a test
//! runs on paused time.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p home-of-suits-integration-tests
//! ```

use std::sync::Arc;

use home_of_suits_core::{Category, Money, ProductId};
use home_of_suits_storefront::Storefront;
use home_of_suits_storefront::config::StorefrontConfig;
use home_of_suits_storefront::models::Product;
use home_of_suits_storefront::models::session::keys;
use home_of_suits_storefront::services::checkout::{CheckoutForm, SequentialOrderIds};
use home_of_suits_storefront::services::session::MemoryStorage;

/// A storefront plus a handle on the storage behind it.
pub struct TestContext {
    pub store: Storefront,
    pub storage: MemoryStorage,
}

impl TestContext {
    /// A fresh store with no stored session and zero latency.
    #[must_use]
    pub fn new() -> Self {
        Self::with_storage(MemoryStorage::new(), StorefrontConfig::instant())
    }

    /// A store over existing storage, as if the process had restarted.
    #[must_use]
    pub fn with_storage(storage: MemoryStorage, config: StorefrontConfig) -> Self {
        let store = Storefront::with_storage(config, Arc::new(storage.clone()))
            .with_order_ids(Box::new(SequentialOrderIds::starting_at(1001)));
        Self { store, storage }
    }

    /// Reopen over the same storage.
    #[must_use]
    pub fn reopen(&self) -> Self {
        Self::with_storage(self.storage.clone(), StorefrontConfig::instant())
    }

    /// Raw persisted session record.
    #[must_use]
    pub fn stored_session(&self) -> Option<serde_json::Value> {
        self.storage
            .get(keys::CURRENT_USER)
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A fully filled-in checkout form.
#[must_use]
pub fn complete_form() -> CheckoutForm {
    CheckoutForm {
        first_name: "James".to_string(),
        last_name: "Bond".to_string(),
        email: "james@example.com".to_string(),
        phone: "+254 712 345 678".to_string(),
        street: "1 Kenyatta Avenue".to_string(),
        city: "Nairobi".to_string(),
        postal_code: "00100".to_string(),
    }
}

/// An off-catalog product at the given price, offered in size `M` and
/// color `Black`.
#[must_use]
pub fn product_priced(id: u32, amount: u64) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Test Suit {id}"),
        price: Money::new(amount),
        category: Category::Business,
        image: "/test.jpg".to_string(),
        description: "A suit used in tests.".to_string(),
        features: vec!["Wool".to_string()],
        sizes: vec!["M".to_string()],
        colors: vec!["Black".to_string()],
        rating: 4.5,
        reviews: 1,
    }
}
