//! Catalog Query
//!
//! Filter and sort pipeline behind the product listing page. [`run`] is a pure
//! function of its inputs: category/audience filter, then price range, then
//! brand set, then a stable sort.

use std::{cmp::Ordering, fmt, str::FromStr};

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::products::{Gender, Product};

/// Upper bound of the listing page price slider.
pub const DEFAULT_MAX_PRICE: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

/// Which slice of the catalog a listing shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Match on the product's audience tag.
    Gender(Gender),

    /// Match on the product's category slug, exactly.
    Category(String),
}

impl CategoryFilter {
    /// Interpret a route slug: reserved audience tags (`men`, `women`, `kids`)
    /// filter by gender, anything else by category.
    pub fn from_slug(slug: &str) -> Self {
        slug.parse::<Gender>()
            .map_or_else(|_err| Self::Category(slug.to_string()), Self::Gender)
    }

    /// Check if a product passes this filter.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::Gender(gender) => product.gender == Some(*gender),
            Self::Category(category) => product.category == *category,
        }
    }
}

/// Inclusive effective-price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    min: Decimal,
    max: Decimal,
}

impl PriceRange {
    /// Create a new inclusive range. Bounds given in the wrong order are swapped.
    pub fn new(min: Decimal, max: Decimal) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// A range that admits every price.
    pub fn any() -> Self {
        Self {
            min: Decimal::MIN,
            max: Decimal::MAX,
        }
    }

    /// Lower bound
    pub fn min(&self) -> Decimal {
        self.min
    }

    /// Upper bound
    pub fn max(&self) -> Decimal {
        self.max
    }

    /// Check if a price lies within the range, bounds included.
    pub fn contains(&self, price: Decimal) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::new(Decimal::ZERO, DEFAULT_MAX_PRICE)
    }
}

/// Listing sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Featured products first
    #[default]
    Featured,

    /// Cheapest effective price first
    #[serde(alias = "price-low-high")]
    PriceAsc,

    /// Most expensive effective price first
    #[serde(alias = "price-high-low")]
    PriceDesc,

    /// New arrivals first
    Newest,

    /// Highest rating first
    TopRated,
}

impl SortKey {
    /// Canonical name of the sort key.
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Featured => "featured",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::Newest => "newest",
            SortKey::TopRated => "top-rated",
        }
    }

    /// Compare two products under this sort key.
    ///
    /// Keys without a secondary ordering report ties as [`Ordering::Equal`] so a
    /// stable sort keeps the incoming order.
    pub fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortKey::Featured => b.featured.cmp(&a.featured),
            SortKey::PriceAsc => a.effective_price().cmp(&b.effective_price()),
            SortKey::PriceDesc => b.effective_price().cmp(&a.effective_price()),
            SortKey::Newest => b.is_new.cmp(&a.is_new),
            SortKey::TopRated => b.rating.total_cmp(&a.rating),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown sort key name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort key: {0}")]
pub struct SortKeyError(pub String);

impl FromStr for SortKey {
    type Err = SortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "featured" => Ok(SortKey::Featured),
            "price-asc" | "price-low-high" => Ok(SortKey::PriceAsc),
            "price-desc" | "price-high-low" => Ok(SortKey::PriceDesc),
            "newest" => Ok(SortKey::Newest),
            "top-rated" => Ok(SortKey::TopRated),
            other => Err(SortKeyError(other.to_string())),
        }
    }
}

/// Catalog Query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogQuery {
    /// Category or audience filter, `None` passes every product
    pub category: Option<CategoryFilter>,

    /// Effective-price bounds
    pub price: PriceRange,

    /// Allowed brands, empty means any brand
    pub brands: FxHashSet<String>,

    /// Result ordering
    pub sort: SortKey,
}

impl CatalogQuery {
    /// Create a query with no category or brand filter, the default
    /// `[0, 500]` price range and the featured sort.
    ///
    /// Use [`PriceRange::any`] to list products priced above the default bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a category slug, see [`CategoryFilter::from_slug`].
    #[must_use]
    pub fn with_slug(mut self, slug: &str) -> Self {
        self.category = Some(CategoryFilter::from_slug(slug));
        self
    }

    /// Restrict to a category filter.
    #[must_use]
    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = Some(category);
        self
    }

    /// Restrict the effective price.
    #[must_use]
    pub fn with_price(mut self, price: PriceRange) -> Self {
        self.price = price;
        self
    }

    /// Allow the given brands only.
    #[must_use]
    pub fn with_brands<I, S>(mut self, brands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.brands = brands.into_iter().map(Into::into).collect();
        self
    }

    /// Set the sort order.
    #[must_use]
    pub fn sorted_by(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Check if a product passes every filter of this query.
    pub fn matches(&self, product: &Product) -> bool {
        self.category
            .as_ref()
            .is_none_or(|category| category.matches(product))
            && self.price.contains(product.effective_price())
            && (self.brands.is_empty() || self.brands.contains(&product.brand))
    }
}

/// Filter and sort a catalog snapshot.
///
/// An empty catalog, or a query nothing matches, yields an empty list.
pub fn run<'a>(
    catalog: impl IntoIterator<Item = &'a Product>,
    query: &CatalogQuery,
) -> Vec<&'a Product> {
    let mut results: Vec<&Product> = catalog
        .into_iter()
        .filter(|product| query.matches(product))
        .collect();

    // `sort_by` is stable, ties keep catalog order.
    results.sort_by(|a, b| query.sort.compare(a, b));

    debug!(
        sort = %query.sort,
        brands = query.brands.len(),
        results = results.len(),
        "catalog query"
    );

    results
}
