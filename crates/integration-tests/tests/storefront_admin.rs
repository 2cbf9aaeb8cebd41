//! Admin area access and dashboard scenarios.

#![allow(clippy::unwrap_used)]

use home_of_suits_core::{Money, Role};
use home_of_suits_integration_tests::TestContext;
use home_of_suits_storefront::AppError;
use home_of_suits_storefront::services::admin::AdminError;

#[tokio::test]
async fn test_admin_login_opens_dashboard() {
    let mut ctx = TestContext::new();
    let admin = ctx
        .store
        .admin_login("admin@homeofsuits.com", "admin123")
        .await
        .unwrap();
    assert_eq!(admin.role, Role::Admin);

    let dashboard = ctx.store.dashboard().unwrap();
    assert_eq!(dashboard.stats.total_revenue, Money::new(2_800_000));
    assert_eq!(dashboard.stats.total_orders, 156);
    assert_eq!(dashboard.stats.new_customers, 48);
    assert_eq!(dashboard.stats.product_count, ctx.store.catalog().len());
    assert_eq!(dashboard.weekly_sales.len(), 7);
    assert_eq!(dashboard.weekly_sales[0].sales, Money::new(450_000));

    let names: Vec<_> = dashboard.inventory.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(names[0], "The Royal Navy Slim Fit");
    assert_eq!(names[5], "Velvet Dinner Jacket");
}

#[tokio::test]
async fn test_customer_admin_login_is_denied_and_signed_out() {
    let mut ctx = TestContext::new();
    let err = ctx
        .store
        .admin_login("james@example.com", "secret")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Admin(AdminError::AccessDenied)));
    assert!(ctx.store.current_user().is_none());
    assert!(ctx.stored_session().is_none());
}

#[tokio::test]
async fn test_dashboard_requires_admin() {
    let mut ctx = TestContext::new();
    assert!(matches!(
        ctx.store.dashboard(),
        Err(AppError::Admin(AdminError::NotSignedIn))
    ));

    ctx.store.login("james@example.com", "secret").await.unwrap();
    assert!(matches!(
        ctx.store.dashboard(),
        Err(AppError::Admin(AdminError::AccessDenied))
    ));
}

#[tokio::test]
async fn test_admin_session_survives_restart() {
    let mut ctx = TestContext::new();
    ctx.store
        .admin_login("admin@homeofsuits.com", "admin123")
        .await
        .unwrap();

    let restarted = ctx.reopen();
    assert!(restarted.store.current_user().unwrap().is_admin());
    assert!(restarted.store.dashboard().is_ok());
}
