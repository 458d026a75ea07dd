//! Storefront
//!
//! Storefront is the core of a clothing shop: a catalog with filtered and sorted
//! listings, a cart ledger driven by explicit commands, and checkout totals with
//! shipping and tax.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod fixtures;
pub mod prelude;
pub mod products;
pub mod receipt;
pub mod session;
pub mod utils;

#[cfg(test)]
mod test_support;
