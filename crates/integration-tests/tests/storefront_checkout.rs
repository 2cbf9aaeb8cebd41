//! End-to-end checkout scenarios.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use home_of_suits_core::{Money, OrderStatus, PaymentMethod, ProductId};
use home_of_suits_integration_tests::{TestContext, complete_form, product_priced};
use home_of_suits_storefront::AppError;
use home_of_suits_storefront::config::StorefrontConfig;
use home_of_suits_storefront::error::ValidationError;
use home_of_suits_storefront::models::NewAddress;
use home_of_suits_storefront::services::checkout::CheckoutError;
use home_of_suits_storefront::services::session::MemoryStorage;
use tokio_util::sync::CancellationToken;

// =============================================================================
// Happy Path
// =============================================================================

#[tokio::test]
async fn test_signed_in_checkout_records_order() {
    let mut ctx = TestContext::new();
    ctx.store.login("james@example.com", "secret").await.unwrap();
    ctx.store
        .add_to_cart(ProductId::new(1), Some("40R"), Some("Charcoal"))
        .unwrap();

    let receipt = ctx
        .store
        .place_order(&complete_form(), PaymentMethod::MobileMoney)
        .await
        .unwrap();

    assert_eq!(receipt.order.total, Money::new(40_000));
    assert_eq!(receipt.totals.subtotal, Money::new(38_500));
    assert_eq!(receipt.totals.shipping, Money::new(1_500));
    assert_eq!(receipt.order.status, OrderStatus::Pending);
    assert_eq!(receipt.order.id.as_str(), "#1001");
    assert_eq!(receipt.order.customer.name, "James Bond");
    assert_eq!(receipt.order.customer.address, "1 Kenyatta Avenue, Nairobi");

    assert!(ctx.store.cart().is_empty());
    assert_eq!(ctx.store.orders()[0].id, receipt.order.id);

    let stored = ctx.stored_session().unwrap();
    assert_eq!(stored["orders"][0]["id"], "#1001");
    assert_eq!(stored["orders"][0]["total"], 40_000);
}

#[tokio::test]
async fn test_subtotal_above_threshold_ships_free() {
    let mut ctx = TestContext::new();
    ctx.store.cart_mut().add(&product_priced(90, 52_000), "M", "Black");

    let receipt = ctx
        .store
        .place_order(&complete_form(), PaymentMethod::Card)
        .await
        .unwrap();

    assert_eq!(receipt.order.total, Money::new(52_000));
    assert!(receipt.totals.ships_free());
    assert_eq!(receipt.payment_method, PaymentMethod::Card);
}

#[tokio::test]
async fn test_subtotal_at_threshold_pays_shipping() {
    let mut ctx = TestContext::new();
    ctx.store.cart_mut().add(&product_priced(91, 50_000), "M", "Black");
    assert_eq!(ctx.store.cart_totals().total, Money::new(51_500));

    ctx.store.cart_mut().clear();
    ctx.store.cart_mut().add(&product_priced(92, 50_001), "M", "Black");
    assert_eq!(ctx.store.cart_totals().total, Money::new(50_001));
}

#[tokio::test]
async fn test_guest_checkout_empties_cart_without_history() {
    let mut ctx = TestContext::new();
    ctx.store
        .add_to_cart(ProductId::new(4), Some("40R"), Some("Beige"))
        .unwrap();

    let receipt = ctx
        .store
        .place_order(&complete_form(), PaymentMethod::CashOnDelivery)
        .await
        .unwrap();

    assert_eq!(receipt.order.total, Money::new(34_000));
    assert!(ctx.store.cart().is_empty());
    assert!(ctx.store.orders().is_empty());
    assert!(ctx.stored_session().is_none());
}

#[tokio::test]
async fn test_quick_added_item_checks_out_in_default_variant() {
    let mut ctx = TestContext::new();
    ctx.store.quick_add(ProductId::new(5)).unwrap();

    let receipt = ctx
        .store
        .place_order(&complete_form(), PaymentMethod::MobileMoney)
        .await
        .unwrap();

    let line = &receipt.order.items[0];
    assert_eq!(line.selected_size, "M");
    assert_eq!(line.selected_color, "Default");
    assert!(ctx.store.cart().is_empty());
}

#[tokio::test]
async fn test_checkout_with_saved_address() {
    let mut ctx = TestContext::new();
    ctx.store.login("james@example.com", "secret").await.unwrap();
    let address_id = ctx
        .store
        .add_address(NewAddress {
            label: "Office".to_string(),
            first_name: "James".to_string(),
            last_name: "Bond".to_string(),
            street: "85 Vauxhall Cross".to_string(),
            city: "Mombasa".to_string(),
            postal_code: "80100".to_string(),
            phone: "+254 700 007 007".to_string(),
        })
        .unwrap()
        .unwrap();
    ctx.store
        .add_to_cart(ProductId::new(3), Some("42R"), Some("Black"))
        .unwrap();

    let user = ctx.store.current_user().unwrap();
    let address = user.address(&address_id).unwrap();
    let mut form = ctx.store.checkout_form();
    form.use_address(address, Some(user));

    let receipt = ctx
        .store
        .place_order(&form, PaymentMethod::MobileMoney)
        .await
        .unwrap();

    assert_eq!(receipt.order.customer.address, "85 Vauxhall Cross, Mombasa");
    assert_eq!(receipt.order.customer.email.as_str(), "james@example.com");
    assert_eq!(receipt.order.total, Money::new(78_000));
}

// =============================================================================
// Rejections
// =============================================================================

#[tokio::test]
async fn test_empty_cart_is_rejected() {
    let mut ctx = TestContext::new();
    let err = ctx
        .store
        .place_order(&complete_form(), PaymentMethod::MobileMoney)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Checkout(CheckoutError::EmptyCart)));
}

#[tokio::test]
async fn test_incomplete_form_keeps_cart() {
    let mut ctx = TestContext::new();
    ctx.store.login("james@example.com", "secret").await.unwrap();
    ctx.store
        .add_to_cart(ProductId::new(2), Some("40R"), Some("Black"))
        .unwrap();

    let mut form = complete_form();
    form.city = "  ".to_string();
    let err = ctx
        .store
        .place_order(&form, PaymentMethod::MobileMoney)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Checkout(CheckoutError::Validation(ValidationError::MissingField("city")))
    ));
    assert_eq!(ctx.store.cart().count(), 1);
    assert!(ctx.store.orders().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_checkout_keeps_cart_but_records_order() {
    let config = StorefrontConfig {
        checkout_latency: Duration::from_millis(1_500),
        ..StorefrontConfig::instant()
    };
    let mut ctx = TestContext::with_storage(MemoryStorage::new(), config);
    ctx.store.login("james@example.com", "secret").await.unwrap();
    ctx.store
        .add_to_cart(ProductId::new(1), Some("40R"), Some("Navy Blue"))
        .unwrap();

    let token = CancellationToken::new();
    token.cancel();
    let err = ctx
        .store
        .place_order_with_cancel(&complete_form(), PaymentMethod::MobileMoney, Some(&token))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Checkout(CheckoutError::Cancelled)));
    assert_eq!(ctx.store.cart().count(), 1);
    assert_eq!(ctx.store.orders().len(), 1);
}
