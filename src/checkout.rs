//! Checkout
//!
//! Shipping, tax and grand total derived from a cart's total price. Amounts keep
//! full precision; rounding to cents only happens in [`CheckoutTotals::display`].

use std::{fmt, str::FromStr};

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shipping method chosen at checkout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShippingMethod {
    /// Standard delivery, free above the threshold
    #[default]
    Standard,

    /// Express delivery, always charged
    Express,
}

impl fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShippingMethod::Standard => f.write_str("standard"),
            ShippingMethod::Express => f.write_str("express"),
        }
    }
}

/// Unknown shipping method name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown shipping method: {0}")]
pub struct ShippingMethodError(pub String);

impl FromStr for ShippingMethod {
    type Err = ShippingMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(ShippingMethod::Standard),
            "express" => Ok(ShippingMethod::Express),
            other => Err(ShippingMethodError(other.to_string())),
        }
    }
}

/// Fees and rates applied at checkout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckoutRules {
    /// Subtotal at or above which standard shipping is free
    pub free_shipping_threshold: Decimal,

    /// Standard shipping fee below the threshold
    pub standard_fee: Decimal,

    /// Express shipping fee, charged regardless of subtotal
    pub express_fee: Decimal,

    /// Sales tax rate applied to the subtotal
    pub tax_rate: Percentage,
}

impl Default for CheckoutRules {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Decimal::new(5000, 2),
            standard_fee: Decimal::new(500, 2),
            express_fee: Decimal::new(1500, 2),
            tax_rate: Percentage::from(Decimal::new(7, 2)),
        }
    }
}

impl CheckoutRules {
    /// Shipping cost for a subtotal and method.
    pub fn shipping_cost(&self, subtotal: Decimal, method: ShippingMethod) -> Decimal {
        match method {
            ShippingMethod::Standard if subtotal >= self.free_shipping_threshold => Decimal::ZERO,
            ShippingMethod::Standard => self.standard_fee,
            ShippingMethod::Express => self.express_fee,
        }
    }

    /// Tax due on a subtotal.
    pub fn tax(&self, subtotal: Decimal) -> Decimal {
        self.tax_rate * subtotal
    }

    /// How much more the shopper needs to spend for free standard shipping, or
    /// `None` if the subtotal already qualifies.
    pub fn amount_to_free_shipping(&self, subtotal: Decimal) -> Option<Decimal> {
        (subtotal < self.free_shipping_threshold).then(|| self.free_shipping_threshold - subtotal)
    }

    /// Full breakdown for a subtotal and method.
    pub fn totals(&self, subtotal: Decimal, method: ShippingMethod) -> CheckoutTotals {
        let shipping = self.shipping_cost(subtotal, method);
        let tax = self.tax(subtotal);

        CheckoutTotals {
            method,
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }
}

/// Checkout breakdown at full precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutTotals {
    /// Shipping method the breakdown was computed for
    pub method: ShippingMethod,

    /// Cart total price
    pub subtotal: Decimal,

    /// Shipping cost
    pub shipping: Decimal,

    /// Tax
    pub tax: Decimal,

    /// Subtotal plus shipping plus tax
    pub total: Decimal,
}

impl CheckoutTotals {
    /// Round every amount to cents for display.
    pub fn display(&self, currency: &'static Currency) -> DisplayTotals<'static> {
        DisplayTotals {
            subtotal: to_money(self.subtotal, currency),
            shipping: to_money(self.shipping, currency),
            tax: to_money(self.tax, currency),
            total: to_money(self.total, currency),
        }
    }
}

/// Checkout breakdown rounded to the currency's minor units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayTotals<'a> {
    /// Subtotal
    pub subtotal: Money<'a, Currency>,

    /// Shipping
    pub shipping: Money<'a, Currency>,

    /// Tax
    pub tax: Money<'a, Currency>,

    /// Grand total
    pub total: Money<'a, Currency>,
}

/// Convert a full-precision amount to money, rounding half away from zero to cents.
pub fn to_money(amount: Decimal, currency: &'static Currency) -> Money<'static, Currency> {
    let minor = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|minor| minor.to_i64())
        .unwrap_or(if amount.is_sign_negative() { i64::MIN } else { i64::MAX });

    Money::from_minor(minor, currency)
}

/// Format a full-precision amount for display, e.g. `$31.74`.
pub fn format_amount(amount: Decimal, currency: &'static Currency) -> String {
    format!("{}", to_money(amount, currency))
}
