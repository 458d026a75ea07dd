//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        CartCommand, CartError, CartLedger, CartLine, CartState,
        snapshot::{CartSnapshot, LineSnapshot, SnapshotError},
    },
    catalog::{
        Catalog, CatalogError, CatalogQuery, Category, CategoryFilter, PriceRange, SortKey,
        SortKeyError,
    },
    checkout::{CheckoutRules, CheckoutTotals, DisplayTotals, ShippingMethod, format_amount},
    config::{ConfigError, StoreConfig},
    fixtures::{Fixture, FixtureError},
    products::{Gender, Product, ProductKey},
    receipt::{CartSummary, ReceiptError},
    session::{OrderConfirmation, Session, SessionError},
};
