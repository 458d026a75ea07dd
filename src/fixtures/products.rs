//! Product Fixtures

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::iso::{Currency, EUR, GBP, USD};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    products::{Gender, Product},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Products in catalog order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[expect(clippy::struct_excessive_bools, reason = "Mirrors the product listing flags")]
pub struct ProductFixture {
    /// Product identifier
    pub id: String,

    /// Product name
    pub name: String,

    /// Product description
    #[serde(default)]
    pub description: String,

    /// Product price (e.g., "29.99 USD")
    pub price: String,

    /// Sale price in the same format as `price`
    #[serde(default)]
    pub discounted_price: Option<String>,

    /// Average rating
    pub rating: f64,

    /// Review count
    #[serde(default)]
    pub review_count: u32,

    /// Category slug
    pub category: String,

    /// Audience tag
    #[serde(default)]
    pub gender: Option<Gender>,

    /// Brand name
    pub brand: String,

    /// Image references
    pub images: Vec<String>,

    /// Color labels
    #[serde(default)]
    pub colors: Vec<String>,

    /// Size labels
    #[serde(default)]
    pub sizes: Vec<String>,

    /// Stock flag, defaults to in stock
    #[serde(default = "in_stock_default")]
    pub in_stock: bool,

    /// Featured flag
    #[serde(default)]
    pub featured: bool,

    /// New arrival flag
    #[serde(default)]
    pub is_new: bool,

    /// Sale flag
    #[serde(default)]
    pub on_sale: bool,
}

fn in_stock_default() -> bool {
    true
}

impl ProductFixture {
    /// Convert into a product, returning the currency its prices were written in.
    ///
    /// # Errors
    ///
    /// Returns an error if a price cannot be parsed or the discounted price uses
    /// a different currency from the base price.
    pub fn into_product(self) -> Result<(Product, &'static Currency), FixtureError> {
        let (price, currency) = parse_price(&self.price)?;

        let discounted_price = self
            .discounted_price
            .as_deref()
            .map(|discounted| {
                let (amount, discounted_currency) = parse_price(discounted)?;

                if discounted_currency == currency {
                    Ok(amount)
                } else {
                    Err(FixtureError::CurrencyMismatch(
                        currency.iso_alpha_code.to_string(),
                        discounted_currency.iso_alpha_code.to_string(),
                    ))
                }
            })
            .transpose()?;

        let product = Product {
            id: self.id,
            name: self.name,
            description: self.description,
            price,
            discounted_price,
            rating: self.rating,
            review_count: self.review_count,
            category: self.category,
            gender: self.gender,
            brand: self.brand,
            images: self.images.into_iter().collect(),
            colors: self.colors.into_iter().collect(),
            sizes: self.sizes.into_iter().collect(),
            in_stock: self.in_stock,
            featured: self.featured,
            is_new: self.is_new,
            on_sale: self.on_sale,
        };

        Ok((product, currency))
    }
}

/// Parse price string (e.g., "29.99 USD") into an amount and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = find_currency(currency_code)
        .ok_or_else(|| FixtureError::UnknownCurrency((*currency_code).to_string()))?;

    Ok((amount, currency))
}

/// Look up one of the supported currencies by ISO code.
pub fn find_currency(code: &str) -> Option<&'static Currency> {
    match code {
        "GBP" => Some(GBP),
        "USD" => Some(USD),
        "EUR" => Some(EUR),
        _ => None,
    }
}

/// Parse percentage string (e.g., "7%" or "0.07") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "7%" for 7%
/// - Decimal format: "0.07" for 7%
///
/// Parsing goes through `Decimal` so rates stay exact.
///
/// # Errors
///
/// Returns an error if the string cannot be parsed.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    if let Some(percent_str) = trimmed.strip_suffix('%') {
        let value = percent_str
            .trim()
            .parse::<Decimal>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value / Decimal::ONE_HUNDRED))
    } else {
        let value = trimmed
            .parse::<Decimal>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value))
    }
}
