//! Home of Suits storefront library.
//!
//! Catalog, cart, session and checkout for a menswear shop, plus AI styling
//! advice and the admin dashboard. Front ends drive everything through the
//! [`Storefront`](state::Storefront) façade.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;

pub use error::{AppError, Result};
pub use state::Storefront;
