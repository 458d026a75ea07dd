//! Products

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use smallvec::SmallVec;
use thiserror::Error;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Reserved audience tags. A category slug matching one of these filters on
/// [`Product::gender`] instead of [`Product::category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Men
    Men,

    /// Women
    Women,

    /// Kids
    Kids,
}

impl Gender {
    /// The slug used for this gender in category routes.
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Men => "men",
            Gender::Women => "women",
            Gender::Kids => "kids",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a reserved gender tag.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown gender tag: {0}")]
pub struct UnknownGender(pub String);

impl FromStr for Gender {
    type Err = UnknownGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "men" => Ok(Gender::Men),
            "women" => Ok(Gender::Women),
            "kids" => Ok(Gender::Kids),
            other => Err(UnknownGender(other.to_string())),
        }
    }
}

/// Product
///
/// Products are immutable once loaded into a [`Catalog`](crate::catalog::Catalog);
/// cart lines only ever borrow them.
#[derive(Debug, Clone, PartialEq)]
#[expect(clippy::struct_excessive_bools, reason = "Independent listing flags")]
pub struct Product {
    /// Unique product identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Long-form description
    pub description: String,

    /// Base price
    pub price: Decimal,

    /// Sale price, never above the base price
    pub discounted_price: Option<Decimal>,

    /// Average rating between 0.0 and 5.0
    pub rating: f64,

    /// Number of reviews behind the rating
    pub review_count: u32,

    /// Category slug (e.g. `tshirts`)
    pub category: String,

    /// Audience tag
    pub gender: Option<Gender>,

    /// Brand name
    pub brand: String,

    /// Image references, first one is the primary image
    pub images: SmallVec<[String; 4]>,

    /// Available colors, empty when the product has no color choice
    pub colors: SmallVec<[String; 4]>,

    /// Available sizes in display order, empty when the product is one-size
    pub sizes: SmallVec<[String; 5]>,

    /// Whether the product can be ordered
    pub in_stock: bool,

    /// Shown in the featured section and first under the default sort
    pub featured: bool,

    /// New arrival
    pub is_new: bool,

    /// On sale
    pub on_sale: bool,
}

impl Product {
    /// The price a shopper pays per unit: the discounted price if there is one,
    /// otherwise the base price.
    pub fn effective_price(&self) -> Decimal {
        self.discounted_price.unwrap_or(self.price)
    }

    /// Whole-percent saving of the discounted price against the base price.
    ///
    /// Returns `None` when the product has no discounted price or the base
    /// price is zero.
    pub fn discount_percent(&self) -> Option<u32> {
        let discounted = self.discounted_price?;

        if self.price.is_zero() {
            return None;
        }

        ((self.price - discounted) / self.price * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
    }

    /// The primary image, if any.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}
