//! Domain models for the storefront.
//!
//! These are plain data: every type here serializes with camelCase field
//! names so a persisted session record keeps the same shape across runs.

pub mod cart;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{CartLine, CartLineKey};
pub use order::{CustomerSnapshot, Order};
pub use product::{Product, Testimonial};
pub use user::{Address, NewAddress, ProfileUpdate, User};
