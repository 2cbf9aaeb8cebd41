//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `cart` - Line items, merging and totals
//! - `session` - Current user, mock authentication and local persistence
//! - `checkout` - Order placement from a cart snapshot
//! - `advice` - AI stylist answers
//! - `admin` - Role gate and dashboard read model
//! - `latency` - Simulated network latency with cancellation

pub mod admin;
pub mod advice;
pub mod cart;
pub mod checkout;
pub mod latency;
pub mod session;
