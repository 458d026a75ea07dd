//! Fixtures
//!
//! Loads catalog data from YAML files laid out as
//! `<base>/products/<set>.yml` and `<base>/categories/<set>.yml`.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashSet;
use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::info;

use crate::{
    catalog::{Catalog, CatalogError, Category},
    fixtures::{categories::CategoriesFixture, products::ProductsFixture},
    products::Product,
};

pub mod categories;
pub mod products;

pub use products::{find_currency, parse_percentage, parse_price};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Two products in the loaded sets share an id
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// Catalog validation error
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Products in file order
    products: Vec<Product>,

    /// Product ids seen so far
    product_ids: FxHashSet<String>,

    /// Category tiles in file order
    categories: Vec<Category>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: Vec::new(),
            product_ids: FxHashSet::default(),
            categories: Vec::new(),
            currency: None,
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a price is
    /// malformed, an id repeats, or the currency differs from products loaded
    /// earlier.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        for product_fixture in fixture.products {
            let (product, currency) = product_fixture.into_product()?;

            // Validate currency consistency
            if let Some(existing_currency) = self.currency {
                if existing_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            if !self.product_ids.insert(product.id.clone()) {
                return Err(FixtureError::DuplicateProduct(product.id));
            }

            self.products.push(product);
        }

        info!(set = name, products = self.products.len(), "loaded product fixtures");

        Ok(self)
    }

    /// Load category tiles from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_categories(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self
            .base_path
            .join("categories")
            .join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CategoriesFixture = serde_norway::from_str(&contents)?;

        self.categories
            .extend(fixture.categories.into_iter().map(Category::from));

        info!(set = name, categories = self.categories.len(), "loaded category fixtures");

        Ok(self)
    }

    /// Load products and categories for a fixture set from `./fixtures`
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_products(name)?.load_categories(name)?;

        Ok(fixture)
    }

    /// Get all loaded products
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Get all loaded categories
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// Build a validated catalog from the loaded products and categories
    ///
    /// # Errors
    ///
    /// Returns an error if no products were loaded or a product fails catalog
    /// validation.
    pub fn into_catalog(self) -> Result<Catalog, FixtureError> {
        let currency = self.currency()?;
        let mut catalog = Catalog::with_products(self.products, currency)?;

        for category in self.categories {
            catalog.add_category(category);
        }

        Ok(catalog)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
