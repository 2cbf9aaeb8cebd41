//! The storefront façade.
//!
//! [`Storefront`] owns one shopper's catalog view, cart, session and the
//! services that act on them. Front ends hold one per process and drive it
//! through `&mut self`, so only one handler runs at a time.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::instrument;

use home_of_suits_core::{AddressId, PaymentMethod, ProductId};

use crate::catalog::{Catalog, CategoryFilter, SortOrder};
use crate::config::StorefrontConfig;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::{CartLineKey, NewAddress, Order, Product, ProfileUpdate, User};
use crate::services::admin::{AdminError, AdminGate, Dashboard};
use crate::services::advice::StylistService;
use crate::services::cart::{Cart, CartTotals};
use crate::services::checkout::{CheckoutForm, CheckoutService, OrderIdGenerator, Receipt};
use crate::services::latency::Latency;
use crate::services::session::{FileStorage, SessionStorage, SessionStore};

/// Size and color used by [`Storefront::quick_add`].
pub const QUICK_ADD_SIZE: &str = "M";
pub const QUICK_ADD_COLOR: &str = "Default";

/// One shopper's view of the store.
#[derive(Debug)]
pub struct Storefront {
    config: StorefrontConfig,
    catalog: Catalog,
    cart: Cart,
    session: SessionStore,
    checkout: CheckoutService,
    stylist: StylistService,
}

impl Storefront {
    /// Open a storefront persisting its session under `config.data_dir`.
    #[must_use]
    pub fn open(config: StorefrontConfig) -> Self {
        let storage = Arc::new(FileStorage::new(config.data_dir.clone()));
        Self::with_storage(config, storage)
    }

    /// Open a storefront over the given session storage.
    ///
    /// Restores the previously signed-in user, if any. An unusable stylist
    /// key leaves the stylist offline instead of failing.
    #[must_use]
    pub fn with_storage(config: StorefrontConfig, storage: Arc<dyn SessionStorage>) -> Self {
        let session = SessionStore::open(storage, Latency::new(config.auth_latency));
        let checkout = CheckoutService::new(Latency::new(config.checkout_latency));
        let stylist = StylistService::new(&config.gemini);

        Self {
            config,
            catalog: Catalog::seeded(),
            cart: Cart::new(),
            session,
            checkout,
            stylist,
        }
    }

    /// Replace the order id source.
    #[must_use]
    pub fn with_order_ids(mut self, order_ids: Box<dyn OrderIdGenerator>) -> Self {
        self.checkout =
            CheckoutService::with_order_ids(Latency::new(self.config.checkout_latency), order_ids);
        self
    }

    /// Replace the stylist.
    #[must_use]
    pub fn with_stylist(mut self, stylist: StylistService) -> Self {
        self.stylist = stylist;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Direct access to the cart for operations the façade does not wrap.
    pub const fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub const fn stylist(&self) -> &StylistService {
        &self.stylist
    }

    /// The signed-in user.
    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.session.current()
    }

    /// The signed-in user's orders, newest first. Empty for guests.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        self.session
            .current()
            .map(|user| user.orders.as_slice())
            .unwrap_or_default()
    }

    // Catalog

    #[must_use]
    pub fn browse(&self, filter: CategoryFilter, sort: SortOrder) -> Vec<&Product> {
        self.catalog.browse(filter, sort)
    }

    /// Look up a product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown id.
    pub fn product(&self, id: ProductId) -> Result<&Product> {
        self.catalog
            .find(id)
            .ok_or_else(|| AppError::NotFound(format!("product {id}")))
    }

    // Cart

    /// Add one unit of a catalog product in the chosen size and color.
    ///
    /// # Errors
    ///
    /// `AppError::NotFound` for an unknown product, `AppError::Validation`
    /// when the size or color is missing or not offered.
    pub fn add_to_cart(
        &mut self,
        product_id: ProductId,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Result<()> {
        let product = self
            .catalog
            .find(product_id)
            .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;
        self.cart.add_selection(product, size, color)?;

        add_breadcrumb(
            "cart",
            "Added to cart",
            Some(&[
                ("product_id", &product_id.to_string()),
                ("size", size.unwrap_or_default()),
                ("color", color.unwrap_or_default()),
            ]),
        );
        Ok(())
    }

    /// Add one unit of a product straight from a listing, in the default
    /// size and color and without checking them against the product.
    ///
    /// # Errors
    ///
    /// `AppError::NotFound` for an unknown product.
    pub fn quick_add(&mut self, product_id: ProductId) -> Result<()> {
        let product = self
            .catalog
            .find(product_id)
            .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;
        self.cart.add(product, QUICK_ADD_SIZE, QUICK_ADD_COLOR);

        add_breadcrumb("cart", "Quick added to cart", Some(&[("product_id", &product_id.to_string())]));
        Ok(())
    }

    /// Remove every line of a product.
    pub fn remove_from_cart(&mut self, product_id: ProductId) {
        self.cart.remove(product_id);
        add_breadcrumb("cart", "Removed from cart", Some(&[("product_id", &product_id.to_string())]));
    }

    /// Adjust every line of a product by `delta`.
    pub fn update_quantity(&mut self, product_id: ProductId, delta: i32) {
        self.cart.update_quantity(product_id, delta);
    }

    /// Adjust one exact line by `delta`, returning its new quantity.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Cart` if the line is missing or would drop below one.
    pub fn update_line_quantity(&mut self, key: &CartLineKey, delta: i32) -> Result<u32> {
        Ok(self.cart.update_line_quantity(key, delta)?)
    }

    #[must_use]
    pub fn cart_totals(&self) -> CartTotals {
        self.cart.totals()
    }

    // Session

    /// Sign in. See [`SessionStore::login`].
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` on bad input or a failed save.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User> {
        self.login_with_cancel(email, password, None).await
    }

    /// [`login`](Self::login) with a cancellation hook on the simulated wait.
    ///
    /// # Errors
    ///
    /// As [`login`](Self::login), plus `AuthError::Cancelled`.
    pub async fn login_with_cancel(
        &mut self,
        email: &str,
        password: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<User> {
        Ok(self.session.login(email, password, cancel).await?)
    }

    /// Create an account and sign in as it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` on bad input or a failed save.
    pub async fn register(&mut self, name: &str, email: &str, password: &str) -> Result<User> {
        self.register_with_cancel(name, email, password, None).await
    }

    /// [`register`](Self::register) with a cancellation hook.
    ///
    /// # Errors
    ///
    /// As [`register`](Self::register), plus `AuthError::Cancelled`.
    pub async fn register_with_cancel(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<User> {
        Ok(self.session.register(name, email, password, cancel).await?)
    }

    /// Sign out and forget the stored session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the stored record could not be deleted.
    pub fn logout(&mut self) -> Result<()> {
        Ok(self.session.logout()?)
    }

    /// Edit the signed-in user's profile. No-op for guests.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the change could not be saved.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<()> {
        Ok(self.session.update_profile(update)?)
    }

    /// Save an address to the signed-in user's book and return its id.
    ///
    /// Returns `None` without saving anything when nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the change could not be saved.
    pub fn add_address(&mut self, address: NewAddress) -> Result<Option<AddressId>> {
        if !self.session.is_signed_in() {
            return Ok(None);
        }
        let address = address.into_address();
        let id = address.id.clone();
        self.session.add_address(address)?;
        Ok(Some(id))
    }

    /// Delete an address. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the change could not be saved.
    pub fn remove_address(&mut self, id: &AddressId) -> Result<()> {
        Ok(self.session.remove_address(id)?)
    }

    // Checkout

    /// A checkout form prefilled from the signed-in user.
    #[must_use]
    pub fn checkout_form(&self) -> CheckoutForm {
        self.session
            .current()
            .map(CheckoutForm::prefill_from)
            .unwrap_or_default()
    }

    /// Place an order for the current cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Checkout`; see [`CheckoutService::place_order`].
    pub async fn place_order(
        &mut self,
        form: &CheckoutForm,
        payment_method: PaymentMethod,
    ) -> Result<Receipt> {
        self.place_order_with_cancel(form, payment_method, None).await
    }

    /// [`place_order`](Self::place_order) with a cancellation hook.
    ///
    /// # Errors
    ///
    /// As [`place_order`](Self::place_order), plus `CheckoutError::Cancelled`.
    pub async fn place_order_with_cancel(
        &mut self,
        form: &CheckoutForm,
        payment_method: PaymentMethod,
        cancel: Option<&CancellationToken>,
    ) -> Result<Receipt> {
        Ok(self
            .checkout
            .place_order(&mut self.cart, &mut self.session, form, payment_method, cancel)
            .await?)
    }

    // Advice

    /// Ask the stylist about a catalog product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown product. Advice failures
    /// are folded into the returned text.
    #[instrument(skip(self, question), fields(product_id = %product_id))]
    pub async fn advise(&self, product_id: ProductId, question: &str) -> Result<String> {
        let product = self.product(product_id)?;
        Ok(self.stylist.advise_on(product, question).await)
    }

    // Admin

    /// Sign in to the admin area.
    ///
    /// A valid non-admin sign-in is immediately signed out again.
    ///
    /// # Errors
    ///
    /// `AppError::Auth` on bad input, `AppError::Admin(AccessDenied)` for a
    /// non-admin account.
    pub async fn admin_login(&mut self, email: &str, password: &str) -> Result<User> {
        let user = self.session.login(email, password, None).await?;
        if !user.is_admin() {
            tracing::warn!(user_id = %user.id, "Non-admin attempted admin sign-in");
            self.session.logout()?;
            return Err(AdminError::AccessDenied.into());
        }
        Ok(user)
    }

    /// The admin dashboard.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Admin` unless an admin is signed in.
    pub fn dashboard(&self) -> Result<Dashboard> {
        AdminGate::require(self.session.current())?;
        Ok(Dashboard::build(&self.catalog))
    }
}
