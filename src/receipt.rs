//! Receipt
//!
//! Tabular cart summary for terminals. Line and summary amounts are rounded to
//! cents here and nowhere else.

use std::io;

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{CartLine, CartState},
    checkout::{CheckoutRules, CheckoutTotals, ShippingMethod, format_amount},
};

/// Errors that can occur when writing a cart summary.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// Cart lines with their checkout breakdown, ready to print.
#[derive(Debug, Clone)]
pub struct CartSummary<'s, 'a> {
    state: &'s CartState<'a>,
    totals: CheckoutTotals,
    free_shipping_remaining: Option<Decimal>,
    currency: &'static Currency,
}

impl<'s, 'a> CartSummary<'s, 'a> {
    /// Summarise a cart for the given shipping method.
    pub fn new(
        state: &'s CartState<'a>,
        rules: &CheckoutRules,
        method: ShippingMethod,
        currency: &'static Currency,
    ) -> Self {
        let subtotal = state.total_price();

        let free_shipping_remaining = match method {
            ShippingMethod::Standard => rules.amount_to_free_shipping(subtotal),
            ShippingMethod::Express => None,
        };

        Self {
            state,
            totals: rules.totals(subtotal, method),
            free_shipping_remaining,
            currency,
        }
    }

    /// Checkout breakdown at full precision.
    pub fn totals(&self) -> &CheckoutTotals {
        &self.totals
    }

    /// Amount still needed for free standard shipping, if any.
    pub fn free_shipping_remaining(&self) -> Option<Decimal> {
        self.free_shipping_remaining
    }

    /// Writes the line table followed by the checkout summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        if self.state.is_empty() {
            return writeln!(out, "\nYour cart is empty.\n").map_err(|_err| ReceiptError::IO);
        }

        let mut builder = Builder::default();

        push_header(&mut builder);

        for (idx, line) in self.state.lines().iter().enumerate() {
            push_line(&mut builder, idx, line, self.currency);
        }

        write_table(&mut out, builder)?;
        write_summary(&mut out, self)
    }
}

fn push_header(builder: &mut Builder) {
    builder.push_record(["", "Item", "Size", "Color", "Qty", "Unit Price", "Total"]);
}

fn push_line(builder: &mut Builder, idx: usize, line: &CartLine<'_>, currency: &'static Currency) {
    let product = line.product();

    builder.push_record([
        format!("#{:<3}", idx + 1),
        product.name.clone(),
        line.size().unwrap_or_default().to_string(),
        line.color().unwrap_or_default().to_string(),
        line.quantity().to_string(),
        format_amount(product.effective_price(), currency),
        format_amount(line.line_total(), currency),
    ]);
}

fn write_table(out: &mut impl io::Write, builder: Builder) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(4..7), Alignment::right());

    writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)
}

fn write_summary(
    out: &mut impl io::Write,
    summary: &CartSummary<'_, '_>,
) -> Result<(), ReceiptError> {
    let totals = &summary.totals;
    let currency = summary.currency;

    let shipping = if totals.shipping.is_zero() {
        "Free".to_string()
    } else {
        format_amount(totals.shipping, currency)
    };

    let rows = [
        ("Subtotal:", format_amount(totals.subtotal, currency)),
        ("Shipping:", shipping),
        ("Tax:", format_amount(totals.tax, currency)),
        ("Total:", format_amount(totals.total, currency)),
    ];

    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

    for (label, value) in &rows {
        writeln!(out, " {label:>label_width$}  {value:>value_width$}")
            .map_err(|_err| ReceiptError::IO)?;
    }

    if let Some(remaining) = summary.free_shipping_remaining {
        writeln!(
            out,
            "\n Add {} more to qualify for free shipping.",
            format_amount(remaining, currency)
        )
        .map_err(|_err| ReceiptError::IO)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::{
        cart::CartLedger,
        test_support::{price, product},
    };

    use super::*;

    fn render(summary: &CartSummary<'_, '_>) -> Result<String, Box<dyn std::error::Error>> {
        let mut out = Vec::new();
        summary.write_to(&mut out)?;

        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn write_to_renders_lines_and_totals() -> TestResult {
        let shirt = product("1", price(2999), Some(price(2499)));
        let mut ledger = CartLedger::new();
        ledger.add(&shirt, 1, Some("M"), Some("Black"))?;

        let summary = CartSummary::new(
            ledger.state(),
            &CheckoutRules::default(),
            ShippingMethod::Standard,
            USD,
        );

        let output = render(&summary)?;

        assert!(output.contains("Product 1"));
        assert!(output.contains("Black"));
        assert!(output.contains("$24.99"));
        assert!(output.contains("Subtotal:"));
        assert!(output.contains("$31.74"));
        assert!(output.contains("Add $25.01 more to qualify for free shipping."));

        Ok(())
    }

    #[test]
    fn free_shipping_is_labelled() -> TestResult {
        let coat = product("2", price(12000), None);
        let mut ledger = CartLedger::new();
        ledger.add(&coat, 1, None, None)?;

        let summary = CartSummary::new(
            ledger.state(),
            &CheckoutRules::default(),
            ShippingMethod::Standard,
            USD,
        );

        let output = render(&summary)?;

        assert!(output.contains("Free"));
        assert!(!output.contains("more to qualify"));
        assert_eq!(summary.free_shipping_remaining(), None);

        Ok(())
    }

    #[test]
    fn express_summary_has_no_free_shipping_hint() -> TestResult {
        let shirt = product("1", price(1000), None);
        let mut ledger = CartLedger::new();
        ledger.add(&shirt, 2, None, None)?;

        let summary = CartSummary::new(
            ledger.state(),
            &CheckoutRules::default(),
            ShippingMethod::Express,
            USD,
        );

        assert_eq!(summary.totals().shipping, price(1500));
        assert!(!render(&summary)?.contains("more to qualify"));

        Ok(())
    }

    #[test]
    fn empty_cart_prints_a_notice() -> TestResult {
        let state = CartState::new();
        let summary = CartSummary::new(
            &state,
            &CheckoutRules::default(),
            ShippingMethod::Standard,
            USD,
        );

        assert!(render(&summary)?.contains("Your cart is empty."));

        Ok(())
    }
}
