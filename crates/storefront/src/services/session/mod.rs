//! Session and profile store.
//!
//! Holds the one current [`User`] and mirrors it into a single storage slot
//! after every change. Authentication is simulated:
//!
//! 1. The hardcoded administrator pair signs in as the administrator.
//! 2. Any other email that matches the stored user restores that user,
//!    order history included.
//! 3. Anything else signs in as the demo customer with the given email.
//!
//! Emails are matched exactly as typed and never format-checked, so any
//! non-empty input signs someone in. Passwords are only compared on the
//! administrator path.

mod error;
mod storage;

pub use error::{AuthError, SessionError, StorageError};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};

use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::instrument;
use uuid::Uuid;

use home_of_suits_core::{AddressId, Role, UserId};

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::session::keys;
use crate::models::{Address, Order, ProfileUpdate, User};
use crate::services::latency::Latency;

/// Email of the built-in administrator.
pub const ADMIN_EMAIL: &str = "admin@homeofsuits.com";
const ADMIN_PASSWORD: &str = "admin123";
const ADMIN_ID: &str = "admin_01";
const ADMIN_NAME: &str = "Administrator";
const ADMIN_PHONE: &str = "+254 700 000 000";

const DEMO_CUSTOMER_ID: &str = "u1";
const DEMO_CUSTOMER_NAME: &str = "James Bond";
const DEMO_CUSTOMER_PHONE: &str = "+254 712 345 678";

/// The current-user store.
#[derive(Debug)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    current: Option<User>,
    latency: Latency,
}

impl SessionStore {
    /// Open the store and restore any persisted user.
    ///
    /// An unreadable or malformed record leaves the store signed out; the
    /// problem is logged, never returned.
    #[must_use]
    pub fn open(storage: Arc<dyn SessionStorage>, latency: Latency) -> Self {
        let current = read_stored_user(storage.as_ref());
        if let Some(user) = &current {
            tracing::info!(user_id = %user.id, role = %user.role, "Restored session");
        }
        Self {
            storage,
            current,
            latency,
        }
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&User> {
        self.current.as_ref()
    }

    /// Whether someone is signed in.
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }

    /// Sign in.
    ///
    /// Waits for the configured latency, then resolves the user as
    /// described in the module docs, persists it and makes it current.
    ///
    /// # Errors
    ///
    /// - `AuthError::MissingEmail` / `AuthError::MissingPassword` for blank
    ///   input (checked before waiting)
    /// - `AuthError::Cancelled` if `cancel` fires during the wait
    /// - `AuthError::Session` if the user became current but could not be saved
    #[instrument(skip(self, password, cancel))]
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<User, AuthError> {
        check_credentials(email, password)?;

        self.latency.wait(cancel).await?;

        let user = if email == ADMIN_EMAIL && password == ADMIN_PASSWORD {
            tracing::info!("Administrator signed in");
            admin_user(email)
        } else if let Some(stored) =
            read_stored_user(self.storage.as_ref()).filter(|stored| stored.email == email)
        {
            tracing::info!(user_id = %stored.id, "Returning customer signed in");
            stored
        } else {
            tracing::info!("Demo customer signed in");
            demo_customer(email)
        };

        self.sign_in(user)
    }

    /// Create an account and sign in as it.
    ///
    /// Always mints a fresh customer with empty history, replacing whatever
    /// user was stored before.
    ///
    /// # Errors
    ///
    /// Same as [`login`](Self::login), plus `AuthError::MissingName`.
    #[instrument(skip(self, password, cancel))]
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<User, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingName);
        }
        check_credentials(email, password)?;

        self.latency.wait(cancel).await?;

        let user = User {
            id: UserId::new(format!("u_{}", Uuid::new_v4().simple())),
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            addresses: Vec::new(),
            orders: Vec::new(),
            joined_at: Utc::now(),
            role: Role::Customer,
        };
        tracing::info!(user_id = %user.id, "Registered new customer");

        self.sign_in(user)
    }

    /// Sign out and delete the stored record.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the slot could not be removed; the
    /// store is signed out regardless.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        if let Some(user) = self.current.take() {
            tracing::info!(user_id = %user.id, "Signed out");
        }
        clear_sentry_user();
        self.storage.remove(keys::CURRENT_USER)?;
        Ok(())
    }

    /// Merge profile fields into the current user. No-op when signed out.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the updated user could not be saved.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<(), SessionError> {
        self.mutate(|user| update.apply_to(user))
    }

    /// Append a saved address. No-op when signed out.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the updated user could not be saved.
    pub fn add_address(&mut self, address: Address) -> Result<(), SessionError> {
        self.mutate(|user| user.addresses.push(address))
    }

    /// Drop the saved address with this id. No-op when signed out.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the updated user could not be saved.
    pub fn remove_address(&mut self, id: &AddressId) -> Result<(), SessionError> {
        self.mutate(|user| user.addresses.retain(|a| &a.id != id))
    }

    /// Put an order at the front of the history. No-op when signed out.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the updated user could not be saved.
    pub fn add_order(&mut self, order: Order) -> Result<(), SessionError> {
        self.mutate(|user| user.orders.insert(0, order))
    }

    fn sign_in(&mut self, user: User) -> Result<User, AuthError> {
        set_sentry_user(&user.id, Some(&user.email));
        self.current = Some(user.clone());
        self.persist()?;
        Ok(user)
    }

    fn mutate(&mut self, change: impl FnOnce(&mut User)) -> Result<(), SessionError> {
        let Some(user) = self.current.as_mut() else {
            tracing::debug!("No user signed in; ignoring profile change");
            return Ok(());
        };
        change(user);
        self.persist()
    }

    fn persist(&self) -> Result<(), SessionError> {
        let Some(user) = &self.current else {
            return Ok(());
        };
        let json = serde_json::to_string(user)?;
        self.storage.save(keys::CURRENT_USER, &json).map_err(|e| {
            tracing::error!(user_id = %user.id, error = %e, "Failed to persist session");
            SessionError::from(e)
        })
    }
}

fn check_credentials(email: &str, password: &str) -> Result<(), AuthError> {
    if email.is_empty() {
        return Err(AuthError::MissingEmail);
    }
    if password.is_empty() {
        return Err(AuthError::MissingPassword);
    }
    Ok(())
}

/// Read and decode the stored user, logging instead of failing.
fn read_stored_user(storage: &dyn SessionStorage) -> Option<User> {
    let raw = match storage.load(keys::CURRENT_USER) {
        Ok(raw) => raw?,
        Err(e) => {
            tracing::warn!(error = %e, "Could not read stored session");
            return None;
        }
    };
    match serde_json::from_str::<User>(&raw) {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed stored session");
            None
        }
    }
}

fn admin_user(email: &str) -> User {
    User {
        id: UserId::new(ADMIN_ID),
        name: ADMIN_NAME.to_string(),
        email: email.to_string(),
        phone: Some(ADMIN_PHONE.to_string()),
        addresses: Vec::new(),
        orders: Vec::new(),
        joined_at: Utc::now(),
        role: Role::Admin,
    }
}

fn demo_customer(email: &str) -> User {
    User {
        id: UserId::new(DEMO_CUSTOMER_ID),
        name: DEMO_CUSTOMER_NAME.to_string(),
        email: email.to_string(),
        phone: Some(DEMO_CUSTOMER_PHONE.to_string()),
        addresses: Vec::new(),
        orders: Vec::new(),
        joined_at: Utc::now(),
        role: Role::Customer,
    }
}
