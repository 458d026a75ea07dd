//! Checkout Example
//!
//! Lists catalog products matching a query, adds each of them to a cart and
//! places the order.
//!
//! Use `-f` to load a fixture set by name
//! Use `-c` to filter by category slug, `-b` by brand and `-m` by maximum price
//! Use `-s` to choose a sort key and `--shipping` to choose a shipping method
//! Set `RUST_LOG=storefront=debug` to trace ledger commands

use std::io;

use anyhow::Result;
use clap::Parser;
use rust_decimal::Decimal;
use storefront::{
    catalog::{CatalogQuery, PriceRange},
    checkout::format_amount,
    config::StoreConfig,
    fixtures::Fixture,
    receipt::CartSummary,
    session::Session,
    utils::DemoArgs,
};
use tracing_subscriber::EnvFilter;

/// Checkout Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = DemoArgs::parse();

    let config = StoreConfig::load(&args.config)?;
    let catalog = Fixture::from_set(&args.fixture)?.into_catalog()?;

    let mut query = CatalogQuery::new()
        .with_brands(args.brands.iter().map(String::as_str))
        .sorted_by(args.sort);

    if let Some(slug) = args.category.as_deref() {
        query = query.with_slug(slug);
    }

    if let Some(max_price) = args.max_price {
        query = query.with_price(PriceRange::new(Decimal::ZERO, max_price));
    }

    let listing = catalog.query(&query);

    println!(
        "\n{} of {} products ({}):",
        listing.len(),
        catalog.len(),
        args.sort
    );

    for product in &listing {
        println!(
            "  [{}] {} by {}: {}",
            product.id,
            product.name,
            product.brand,
            format_amount(product.effective_price(), catalog.currency())
        );
    }

    let mut session = Session::new(&catalog, config.checkout);

    for product in &listing {
        session.add_to_cart(
            &product.id,
            args.quantity,
            product.sizes.first().map(String::as_str),
            product.colors.first().map(String::as_str),
        )?;
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let summary = CartSummary::new(
        session.cart(),
        session.rules(),
        args.shipping,
        catalog.currency(),
    );

    summary.write_to(&mut handle)?;

    if session.cart().is_empty() {
        return Ok(());
    }

    let confirmation = session.place_order(args.shipping, &mut rand::thread_rng())?;

    println!(
        "Order {} placed: {} items, {} charged, arriving in {} days",
        confirmation.order_number,
        confirmation.item_count,
        format_amount(confirmation.totals.total, catalog.currency()),
        confirmation.estimated_delivery_days
    );

    Ok(())
}
