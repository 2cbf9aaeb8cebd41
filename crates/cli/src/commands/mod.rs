//! Command implementations. Each prints its result to stdout.

#![allow(clippy::print_stdout)]

pub mod account;
pub mod admin;
pub mod advise;
pub mod catalog;
pub mod checkout;
