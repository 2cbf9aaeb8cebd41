//! Checkout flow.
//!
//! Turns a cart snapshot and a filled-in form into an [`Order`]. Nothing is
//! sent anywhere: the order is recorded in the signed-in user's history,
//! the cart is emptied and a receipt comes back.
//!
//! The order is recorded before the simulated submission delay. A
//! cancelled checkout therefore keeps the order in history but leaves the
//! cart as it was, so the shopper can see what they tried to buy.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Local;
use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use home_of_suits_core::{Email, OrderId, OrderStatus, PaymentMethod};

use crate::error::{ValidationError, add_breadcrumb};
use crate::models::{Address, CustomerSnapshot, Order, User};
use crate::services::cart::{Cart, CartTotals};
use crate::services::latency::{Cancelled, Latency};
use crate::services::session::{SessionError, SessionStore};

/// Order numbers are drawn from `0..ORDER_NUMBER_SPACE`.
pub const ORDER_NUMBER_SPACE: u32 = 10_000;

/// Draws before accepting a number already in the user's history.
const MAX_ORDER_ID_ATTEMPTS: usize = 32;

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("your cart is empty")]
    EmptyCart,

    /// The shipping form is incomplete or malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The caller cancelled during submission.
    #[error("checkout cancelled")]
    Cancelled,

    /// The order was placed but could not be saved to history.
    #[error("order placed but not saved: {0}")]
    Session(#[from] SessionError),
}

impl From<Cancelled> for CheckoutError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

/// Shipping and contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
}

impl CheckoutForm {
    /// Start from the user's contact details.
    ///
    /// The first two words of the display name become first and last name.
    /// Address fields are left blank.
    #[must_use]
    pub fn prefill_from(user: &User) -> Self {
        let (first, last) = user.name_parts();
        Self {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: user.email.clone(),
            phone: user.phone.clone().unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Replace everything with a saved address; email comes from the user.
    pub fn use_address(&mut self, address: &Address, user: Option<&User>) {
        *self = Self {
            first_name: address.first_name.clone(),
            last_name: address.last_name.clone(),
            email: user.map(|u| u.email.clone()).unwrap_or_default(),
            phone: address.phone.clone(),
            street: address.street.clone(),
            city: address.city.clone(),
            postal_code: address.postal_code.clone(),
        };
    }

    /// Check every field is filled and the email parses.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, in form order.
    pub fn validate(&self) -> Result<Email, ValidationError> {
        let fields = [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("street", &self.street),
            ("city", &self.city),
            ("postal code", &self.postal_code),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ValidationError::MissingField(*name));
        }
        Ok(Email::parse(&self.email)?)
    }

    fn snapshot(&self, email: Email) -> CustomerSnapshot {
        CustomerSnapshot {
            name: format!("{} {}", self.first_name.trim(), self.last_name.trim()),
            email,
            address: format!("{}, {}", self.street.trim(), self.city.trim()),
        }
    }
}

/// Source of order numbers.
pub trait OrderIdGenerator: Send + Sync + std::fmt::Debug {
    /// Produce a candidate id. May repeat; the checkout re-draws on
    /// collision with the user's history.
    fn next_id(&self) -> OrderId;
}

/// Format an order number as `#NNNN`.
#[must_use]
pub fn format_order_id(number: u32) -> OrderId {
    OrderId::new(format!("#{:04}", number % ORDER_NUMBER_SPACE))
}

/// Uniformly random four-digit order numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOrderIds;

impl OrderIdGenerator for RandomOrderIds {
    fn next_id(&self) -> OrderId {
        format_order_id(rand::rng().random_range(0..ORDER_NUMBER_SPACE))
    }
}

/// Counting order numbers, wrapping after `#9999`.
#[derive(Debug, Default)]
pub struct SequentialOrderIds {
    next: AtomicU32,
}

impl SequentialOrderIds {
    #[must_use]
    pub const fn starting_at(first: u32) -> Self {
        Self {
            next: AtomicU32::new(first),
        }
    }
}

impl OrderIdGenerator for SequentialOrderIds {
    fn next_id(&self) -> OrderId {
        format_order_id(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// What the shopper sees after placing an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    pub order: Order,
    pub payment_method: PaymentMethod,
    pub totals: CartTotals,
}

/// Places orders.
#[derive(Debug)]
pub struct CheckoutService {
    latency: Latency,
    order_ids: Box<dyn OrderIdGenerator>,
}

impl CheckoutService {
    #[must_use]
    pub fn new(latency: Latency) -> Self {
        Self::with_order_ids(latency, Box::new(RandomOrderIds))
    }

    #[must_use]
    pub fn with_order_ids(latency: Latency, order_ids: Box<dyn OrderIdGenerator>) -> Self {
        Self { latency, order_ids }
    }

    /// Place an order for everything in the cart.
    ///
    /// Steps: validate, total the cart, draw an order id, record the order
    /// for the signed-in user (if any), wait out the submission delay,
    /// empty the cart. A guest checkout records nothing but still empties
    /// the cart.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::EmptyCart` / `CheckoutError::Validation` before anything changes
    /// - `CheckoutError::Session` if the order could not be saved; the cart
    ///   is left intact so the shopper can retry
    /// - `CheckoutError::Cancelled` if `cancel` fires during submission
    #[instrument(skip_all, fields(payment = %payment_method, lines = cart.line_count()))]
    pub async fn place_order(
        &self,
        cart: &mut Cart,
        session: &mut SessionStore,
        form: &CheckoutForm,
        payment_method: PaymentMethod,
        cancel: Option<&CancellationToken>,
    ) -> Result<Receipt, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let email = form.validate()?;

        let totals = cart.totals();
        let order = Order {
            id: self.unique_order_id(session.current()),
            items: cart.lines().to_vec(),
            total: totals.total,
            status: OrderStatus::Pending,
            date: Local::now().date_naive(),
            customer: form.snapshot(email),
        };

        if session.is_signed_in() {
            session.add_order(order.clone())?;
        }
        add_breadcrumb(
            "checkout",
            "Order placed",
            Some(&[
                ("order_id", order.id.as_str()),
                ("total", &order.total.amount().to_string()),
            ]),
        );

        self.latency.wait(cancel).await?;

        cart.clear();
        tracing::info!(order_id = %order.id, total = %order.total, "Order confirmed");

        Ok(Receipt {
            order,
            payment_method,
            totals,
        })
    }

    /// Draw an id not already in the user's history.
    ///
    /// A guest has no history to collide with. With a near-full history the
    /// last draw is accepted after a bounded number of attempts.
    fn unique_order_id(&self, user: Option<&User>) -> OrderId {
        let taken: HashSet<&OrderId> = user
            .map(|u| u.orders.iter().map(|o| &o.id).collect())
            .unwrap_or_default();

        let mut id = self.order_ids.next_id();
        for _ in 1..MAX_ORDER_ID_ATTEMPTS {
            if !taken.contains(&id) {
                return id;
            }
            id = self.order_ids.next_id();
        }
        tracing::warn!(order_id = %id, "Could not avoid order id collision");
        id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::Instant;

    use home_of_suits_core::{AddressId, Money, ProductId};

    use super::*;
    use crate::catalog::Catalog;
    use crate::services::session::MemoryStorage;

    fn form() -> CheckoutForm {
        CheckoutForm {
            first_name: "James".to_string(),
            last_name: "Bond".to_string(),
            email: "bond@mi6.gov.uk".to_string(),
            phone: "+254 712 345 678".to_string(),
            street: "1 Riverside Drive".to_string(),
            city: "Nairobi".to_string(),
            postal_code: "00100".to_string(),
        }
    }

    fn cart_with(ids: &[u32]) -> Cart {
        let catalog = Catalog::seeded();
        let mut cart = Cart::new();
        for id in ids {
            let p = catalog.find(ProductId::new(*id)).unwrap();
            cart.add(p, &p.sizes[0], &p.colors[0]);
        }
        cart
    }

    fn session() -> SessionStore {
        SessionStore::open(Arc::new(MemoryStorage::new()), Latency::NONE)
    }

    fn service() -> CheckoutService {
        CheckoutService::with_order_ids(
            Latency::new(Duration::from_millis(1500)),
            Box::new(SequentialOrderIds::starting_at(42)),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_signed_in_checkout_records_order_and_clears_cart() {
        let mut session = session();
        session.login("x@y.com", "pw", None).await.unwrap();
        let mut cart = cart_with(&[1]);

        let start = Instant::now();
        let receipt = service()
            .place_order(&mut cart, &mut session, &form(), PaymentMethod::MobileMoney, None)
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(1500));
        assert_eq!(receipt.order.id.as_str(), "#0042");
        assert_eq!(receipt.order.total, Money::new(40_000));
        assert_eq!(receipt.order.status, OrderStatus::Pending);
        assert_eq!(receipt.order.customer.name, "James Bond");
        assert_eq!(receipt.order.customer.address, "1 Riverside Drive, Nairobi");
        assert_eq!(receipt.totals.shipping, Money::new(1_500));
        assert_eq!(receipt.payment_method, PaymentMethod::MobileMoney);
        assert!(cart.is_empty());

        let history = &session.current().unwrap().orders;
        assert_eq!(history[0].id, receipt.order.id);
        assert_eq!(history[0].items.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_guest_checkout_still_clears_cart() {
        let mut session = session();
        let mut cart = cart_with(&[3]);

        let receipt = service()
            .place_order(&mut cart, &mut session, &form(), PaymentMethod::Card, None)
            .await
            .unwrap();

        assert_eq!(receipt.order.total, Money::new(78_000));
        assert!(receipt.totals.ships_free());
        assert!(cart.is_empty());
        assert!(session.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_cart_is_rejected() {
        let mut session = session();
        let mut cart = Cart::new();
        let result = service()
            .place_order(&mut cart, &mut session, &form(), PaymentMethod::CashOnDelivery, None)
            .await;
        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_incomplete_form_changes_nothing() {
        let mut session = session();
        session.login("x@y.com", "pw", None).await.unwrap();
        let mut cart = cart_with(&[1, 2]);
        let incomplete = CheckoutForm {
            postal_code: "  ".to_string(),
            ..form()
        };

        let result = service()
            .place_order(&mut cart, &mut session, &incomplete, PaymentMethod::Card, None)
            .await;

        assert!(matches!(
            result,
            Err(CheckoutError::Validation(ValidationError::MissingField("postal code")))
        ));
        assert_eq!(cart.count(), 2);
        assert!(session.current().unwrap().orders.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_checkout_keeps_cart() {
        let mut session = session();
        session.login("x@y.com", "pw", None).await.unwrap();
        let mut cart = cart_with(&[1]);
        let token = CancellationToken::new();
        token.cancel();

        let result = service()
            .place_order(&mut cart, &mut session, &form(), PaymentMethod::Card, Some(&token))
            .await;

        assert!(matches!(result, Err(CheckoutError::Cancelled)));
        assert_eq!(cart.count(), 1);
        assert_eq!(session.current().unwrap().orders.len(), 1);
    }

    #[derive(Debug)]
    struct Fixed(Vec<&'static str>, AtomicU32);

    impl OrderIdGenerator for Fixed {
        fn next_id(&self) -> OrderId {
            let i = self.1.fetch_add(1, Ordering::Relaxed) as usize;
            OrderId::new(self.0[i.min(self.0.len() - 1)])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_ids_do_not_repeat_within_history() {
        let mut session = session();
        session.login("x@y.com", "pw", None).await.unwrap();
        let service = CheckoutService::with_order_ids(
            Latency::NONE,
            Box::new(Fixed(vec!["#0007", "#0007", "#0008"], AtomicU32::new(0))),
        );

        let mut cart = cart_with(&[1]);
        let first = service
            .place_order(&mut cart, &mut session, &form(), PaymentMethod::Card, None)
            .await
            .unwrap();
        let mut cart = cart_with(&[2]);
        let second = service
            .place_order(&mut cart, &mut session, &form(), PaymentMethod::Card, None)
            .await
            .unwrap();

        assert_eq!(first.order.id.as_str(), "#0007");
        assert_eq!(second.order.id.as_str(), "#0008");
    }

    #[test]
    fn test_random_ids_are_four_digits() {
        for _ in 0..100 {
            let id = RandomOrderIds.next_id();
            let digits = id.as_str().strip_prefix('#').unwrap();
            assert_eq!(digits.len(), 4);
            assert!(digits.chars().all(|c| c.is_ascii_digit()));
        }
        assert_eq!(format_order_id(7).as_str(), "#0007");
        assert_eq!(format_order_id(10_003).as_str(), "#0003");
    }

    #[test]
    fn test_prefill_splits_name_and_keeps_address_blank() {
        let user = User {
            id: home_of_suits_core::UserId::new("u1"),
            name: "James Bond".to_string(),
            email: "bond@mi6.gov.uk".to_string(),
            phone: None,
            addresses: Vec::new(),
            orders: Vec::new(),
            joined_at: chrono::Utc::now(),
            role: home_of_suits_core::Role::Customer,
        };

        let form = CheckoutForm::prefill_from(&user);
        assert_eq!(form.first_name, "James");
        assert_eq!(form.last_name, "Bond");
        assert_eq!(form.email, "bond@mi6.gov.uk");
        assert_eq!(form.phone, "");
        assert_eq!(form.street, "");
        assert_eq!(form.validate(), Err(ValidationError::MissingField("phone")));

        let mut form = form;
        let office = Address {
            id: AddressId::new("addr_1"),
            label: "Office".to_string(),
            first_name: "Jim".to_string(),
            last_name: "Bond".to_string(),
            street: "Westlands Rd".to_string(),
            city: "Nairobi".to_string(),
            postal_code: "00800".to_string(),
            phone: "+254 700 111 222".to_string(),
        };
        form.use_address(&office, Some(&user));
        assert_eq!(form.first_name, "Jim");
        assert_eq!(form.email, "bond@mi6.gov.uk");
        assert_eq!(form.postal_code, "00800");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_malformed_email_is_a_validation_error() {
        let bad = CheckoutForm {
            email: "bond-at-mi6".to_string(),
            ..form()
        };
        assert!(matches!(bad.validate(), Err(ValidationError::InvalidEmail(_))));
    }
}
