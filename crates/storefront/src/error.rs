//! Unified error handling with Sentry integration.
//!
//! Each service owns a focused error enum; `AppError` aggregates them for
//! front ends that drive several services at once (the CLI, the
//! [`Storefront`](crate::state::Storefront) façade). Server-side faults are
//! captured to Sentry via [`AppError::report`] before being shown to the user.

use thiserror::Error;

use home_of_suits_core::{EmailError, ProductId};

use crate::config::ConfigError;
use crate::services::admin::AdminError;
use crate::services::cart::CartError;
use crate::services::checkout::CheckoutError;
use crate::services::session::{AuthError, SessionError, StorageError};

/// Input rejected before any state changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No size was chosen for a product that needs one.
    #[error("please select a size")]
    MissingSize,

    /// No color was chosen for a product that needs one.
    #[error("please select a color")]
    MissingColor,

    /// The size is not offered for this product.
    #[error("size {size} is not available for product {product_id}")]
    UnknownSize { product_id: ProductId, size: String },

    /// The color is not offered for this product.
    #[error("color {color} is not available for product {product_id}")]
    UnknownColor { product_id: ProductId, color: String },

    /// A required form field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The email field does not look like an email address.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input validation failed.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Login or registration failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session persistence failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Checkout failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Admin area refused access.
    #[error("Admin error: {0}")]
    Admin(#[from] AdminError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Whether the error is a fault on our side (as opposed to bad input or
    /// a refused permission).
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::Session(_)
                | Self::Auth(AuthError::Session(_))
                | Self::Checkout(CheckoutError::Session(_))
        )
    }

    /// Capture internal errors to Sentry and log them.
    ///
    /// User-facing failures (validation, access denied, not found) are only
    /// logged at `debug`.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::debug!(error = %self, "Rejected request");
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        Self::Session(SessionError::Storage(err))
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
