//! Utils

use clap::Parser;
use rust_decimal::Decimal;

use crate::{catalog::SortKey, checkout::ShippingMethod};

/// Arguments for the checkout demo
#[derive(Debug, Parser)]
pub struct DemoArgs {
    /// Fixture set to load products and categories from
    #[clap(short, long, default_value = "sample")]
    pub fixture: String,

    /// Store config file
    #[clap(long, default_value = "config/store.yml")]
    pub config: String,

    /// Category slug (`men`, `women`, `kids` or a product category)
    #[clap(short, long)]
    pub category: Option<String>,

    /// Sort key (`featured`, `price-asc`, `price-desc`, `newest`, `top-rated`)
    #[clap(short, long, default_value_t)]
    pub sort: SortKey,

    /// Brands to include, repeat or comma-separate
    #[clap(short, long, value_delimiter = ',')]
    pub brands: Vec<String>,

    /// Highest effective price to include
    #[clap(short, long)]
    pub max_price: Option<Decimal>,

    /// Shipping method (`standard` or `express`)
    #[clap(long, default_value_t)]
    pub shipping: ShippingMethod,

    /// Units of each listed product to add to the cart
    #[clap(short, long, default_value_t = 1)]
    pub quantity: i64,
}
