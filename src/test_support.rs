//! Shared helpers for unit tests.

use rust_decimal::Decimal;
use smallvec::{SmallVec, smallvec};

use crate::products::{Gender, Product};

/// Build a decimal price from minor units (e.g. `2499` -> `24.99`).
pub(crate) fn price(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

/// Minimal product with sensible defaults.
pub(crate) fn product(id: &str, price: Decimal, discounted: Option<Decimal>) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {id}"),
        description: String::new(),
        price,
        discounted_price: discounted,
        rating: 4.0,
        review_count: 0,
        category: "misc".to_string(),
        gender: None,
        brand: "Acme".to_string(),
        images: smallvec![format!("{id}.jpeg")],
        colors: SmallVec::new(),
        sizes: SmallVec::new(),
        in_stock: true,
        featured: false,
        is_new: false,
        on_sale: discounted.is_some(),
    }
}

/// Product with catalog-facing attributes for query tests.
pub(crate) fn listed(
    id: &str,
    minor: i64,
    category: &str,
    gender: Option<Gender>,
    brand: &str,
) -> Product {
    Product {
        category: category.to_string(),
        gender,
        brand: brand.to_string(),
        ..product(id, price(minor), None)
    }
}
