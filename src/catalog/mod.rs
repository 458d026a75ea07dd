//! Catalog
//!
//! The catalog is the read-only product set a storefront session browses. It is
//! built once (usually from a fixture set, see [`crate::fixtures`]) and then only
//! borrowed: queries return references into it and cart lines point at its
//! products.

use rust_decimal::Decimal;
use rustc_hash::{FxHashMap, FxHashSet};
use rusty_money::iso::Currency;
use slotmap::SlotMap;
use thiserror::Error;

use crate::products::{Product, ProductKey};

pub mod query;

pub use query::{CatalogQuery, CategoryFilter, PriceRange, SortKey, SortKeyError};

/// Number of related products shown alongside a product.
pub const RELATED_PRODUCTS_LIMIT: usize = 4;

/// Errors raised while building a catalog.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// Two products share an identifier.
    #[error("duplicate product id: {0}")]
    DuplicateProduct(String),

    /// Base price is zero or negative.
    #[error("product {id} has a non-positive price: {price}")]
    InvalidPrice {
        /// Product identifier
        id: String,
        /// Offending price
        price: Decimal,
    },

    /// Discounted price is higher than the base price.
    #[error("product {id} has a discounted price {discounted} above its price {price}")]
    DiscountAbovePrice {
        /// Product identifier
        id: String,
        /// Base price
        price: Decimal,
        /// Discounted price
        discounted: Decimal,
    },

    /// Rating outside 0.0 to 5.0.
    #[error("product {id} has a rating outside 0-5: {rating}")]
    RatingOutOfRange {
        /// Product identifier
        id: String,
        /// Offending rating
        rating: f64,
    },

    /// Product has no images.
    #[error("product {0} has no images")]
    MissingImages(String),
}

/// Category tile shown on the storefront landing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Category identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Slug used to filter the catalog, see [`CategoryFilter::from_slug`]
    pub slug: String,

    /// Tile image reference
    pub image: String,
}

/// Catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    products: SlotMap<ProductKey, Product>,

    /// Catalog order, which is the order queries filter and stable-sort from
    order: Vec<ProductKey>,

    /// Product id -> `SlotMap` key
    ids: FxHashMap<String, ProductKey>,

    categories: Vec<Category>,

    currency: &'static Currency,
}

impl Catalog {
    /// Create an empty catalog priced in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            products: SlotMap::with_key(),
            order: Vec::new(),
            ids: FxHashMap::default(),
            categories: Vec::new(),
            currency,
        }
    }

    /// Create a catalog from the given products, in order.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if any product fails validation.
    pub fn with_products(
        products: impl IntoIterator<Item = Product>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new(currency);

        for product in products {
            catalog.insert(product)?;
        }

        Ok(catalog)
    }

    /// Validate and append a product.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the id is already taken, the price is not
    /// positive, the discounted price is above the price, the rating is outside
    /// 0.0 to 5.0, or the product has no images.
    pub fn insert(&mut self, product: Product) -> Result<ProductKey, CatalogError> {
        validate(&product)?;

        if self.ids.contains_key(&product.id) {
            return Err(CatalogError::DuplicateProduct(product.id));
        }

        let id = product.id.clone();
        let key = self.products.insert(product);

        self.order.push(key);
        self.ids.insert(id, key);

        Ok(key)
    }

    /// Append a category tile.
    pub fn add_category(&mut self, category: Category) {
        self.categories.push(category);
    }

    /// Look up a product by id.
    pub fn get(&self, id: &str) -> Option<&Product> {
        let key = self.ids.get(id)?;

        self.products.get(*key)
    }

    /// Look up a product by key.
    pub fn get_by_key(&self, key: ProductKey) -> Option<&Product> {
        self.products.get(key)
    }

    /// Iterate products in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> + '_ {
        self.order.iter().filter_map(|key| self.products.get(*key))
    }

    /// Run a query against the whole catalog.
    pub fn query(&self, query: &CatalogQuery) -> Vec<&Product> {
        query::run(self.iter(), query)
    }

    /// Distinct brands in the order they first appear.
    pub fn brands(&self) -> Vec<&str> {
        let mut seen = FxHashSet::default();

        self.iter()
            .map(|product| product.brand.as_str())
            .filter(|brand| seen.insert(*brand))
            .collect()
    }

    /// Featured products in catalog order.
    pub fn featured(&self) -> Vec<&Product> {
        self.iter().filter(|product| product.featured).collect()
    }

    /// Products related to the given product: same category or same audience
    /// tag, excluding the product itself, in catalog order.
    ///
    /// Two products without an audience tag count as sharing one. An unknown
    /// id has no related products.
    pub fn related(&self, id: &str, limit: usize) -> Vec<&Product> {
        let Some(subject) = self.get(id) else {
            return Vec::new();
        };

        self.iter()
            .filter(|product| product.id != subject.id)
            .filter(|product| {
                product.category == subject.category || product.gender == subject.gender
            })
            .take(limit)
            .collect()
    }

    /// Category tiles in load order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Currency all catalog prices are expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn validate(product: &Product) -> Result<(), CatalogError> {
    if product.price <= Decimal::ZERO {
        return Err(CatalogError::InvalidPrice {
            id: product.id.clone(),
            price: product.price,
        });
    }

    if let Some(discounted) = product.discounted_price
        && discounted > product.price
    {
        return Err(CatalogError::DiscountAbovePrice {
            id: product.id.clone(),
            price: product.price,
            discounted,
        });
    }

    if !(0.0..=5.0).contains(&product.rating) {
        return Err(CatalogError::RatingOutOfRange {
            id: product.id.clone(),
            rating: product.rating,
        });
    }

    if product.images.is_empty() {
        return Err(CatalogError::MissingImages(product.id.clone()));
    }

    Ok(())
}
