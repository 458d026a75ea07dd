//! Session
//!
//! One shopper's view of the store: a read-only catalog, a cart ledger and the
//! checkout rules, plus simulated order placement.

use rand::Rng;
use thiserror::Error;
use tracing::info;

use crate::{
    cart::{CartError, CartLedger, CartState},
    catalog::Catalog,
    checkout::{CheckoutRules, CheckoutTotals, ShippingMethod},
};

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Product id is not in the catalog
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// Orders cannot be placed for an empty cart
    #[error("Cannot place an order for an empty cart")]
    EmptyCart,

    /// Cart rejected the command
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Confirmation returned after an order is placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    /// Order reference, e.g. `ORD-482913`
    pub order_number: String,

    /// Amounts charged
    pub totals: CheckoutTotals,

    /// Units ordered
    pub item_count: u64,

    /// Days until delivery
    pub estimated_delivery_days: u8,
}

/// Catalog, cart and checkout rules for one shopper.
#[derive(Debug)]
pub struct Session<'a> {
    catalog: &'a Catalog,
    ledger: CartLedger<'a>,
    rules: CheckoutRules,
}

impl<'a> Session<'a> {
    /// Start a session with an empty cart.
    pub fn new(catalog: &'a Catalog, rules: CheckoutRules) -> Self {
        Self::with_ledger(catalog, rules, CartLedger::new())
    }

    /// Resume a session from an existing ledger.
    pub fn with_ledger(catalog: &'a Catalog, rules: CheckoutRules, ledger: CartLedger<'a>) -> Self {
        Self {
            catalog,
            ledger,
            rules,
        }
    }

    /// Add units of a catalog product by id.
    ///
    /// # Errors
    ///
    /// - [`SessionError::UnknownProduct`]: `product_id` is not in the catalog.
    /// - [`SessionError::Cart`]: the quantity was rejected.
    pub fn add_to_cart(
        &mut self,
        product_id: &str,
        quantity: i64,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Result<&CartState<'a>, SessionError> {
        let catalog = self.catalog;
        let product = catalog
            .get(product_id)
            .ok_or_else(|| SessionError::UnknownProduct(product_id.to_string()))?;

        Ok(self.ledger.add(product, quantity, size, color)?)
    }

    /// Remove every line for a product.
    pub fn remove_from_cart(&mut self, product_id: &str) -> &CartState<'a> {
        self.ledger.remove(product_id)
    }

    /// Set the quantity of a product's first line; zero or less removes it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Cart`] if the quantity does not fit in a line.
    pub fn update_quantity(
        &mut self,
        product_id: &str,
        quantity: i64,
    ) -> Result<&CartState<'a>, SessionError> {
        Ok(self.ledger.update_quantity(product_id, quantity)?)
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) -> &CartState<'a> {
        self.ledger.clear()
    }

    /// Current cart.
    pub fn cart(&self) -> &CartState<'a> {
        self.ledger.state()
    }

    /// Underlying ledger.
    pub fn ledger(&self) -> &CartLedger<'a> {
        &self.ledger
    }

    /// Catalog the session shops from.
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Checkout rules in effect.
    pub fn rules(&self) -> &CheckoutRules {
        &self.rules
    }

    /// Checkout breakdown for the current cart.
    pub fn checkout_totals(&self, method: ShippingMethod) -> CheckoutTotals {
        self.rules.totals(self.cart().total_price(), method)
    }

    /// Submit the cart as an order and empty it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyCart`] if there is nothing to order.
    pub fn place_order<R: Rng + ?Sized>(
        &mut self,
        method: ShippingMethod,
        rng: &mut R,
    ) -> Result<OrderConfirmation, SessionError> {
        if self.cart().is_empty() {
            return Err(SessionError::EmptyCart);
        }

        let totals = self.checkout_totals(method);
        let item_count = self.cart().total_items();

        let confirmation = OrderConfirmation {
            order_number: format!("ORD-{}", rng.gen_range(100_000..=999_999)),
            totals,
            item_count,
            estimated_delivery_days: rng.gen_range(5..=7),
        };

        self.ledger.clear();

        info!(
            order_number = %confirmation.order_number,
            %method,
            item_count,
            total = %totals.total,
            "order placed"
        );

        Ok(confirmation)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use rust_decimal::Decimal;
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::test_support::{price, product};

    use super::*;

    fn catalog() -> Result<Catalog, crate::catalog::CatalogError> {
        Catalog::with_products(
            [
                product("1", price(2999), Some(price(2499))),
                product("2", price(5999), None),
            ],
            USD,
        )
    }

    #[test]
    fn add_to_cart_resolves_ids() -> TestResult {
        let catalog = catalog()?;
        let mut session = Session::new(&catalog, CheckoutRules::default());

        let state = session.add_to_cart("1", 2, Some("M"), None)?;

        assert_eq!(state.total_items(), 2);
        assert_eq!(state.total_price(), price(4998));

        Ok(())
    }

    #[test]
    fn add_to_cart_rejects_unknown_products() -> TestResult {
        let catalog = catalog()?;
        let mut session = Session::new(&catalog, CheckoutRules::default());

        let result = session.add_to_cart("404", 1, None, None);

        assert!(matches!(result, Err(SessionError::UnknownProduct(id)) if id == "404"));
        assert!(session.cart().is_empty());

        Ok(())
    }

    #[test]
    fn add_to_cart_surfaces_cart_errors() -> TestResult {
        let catalog = catalog()?;
        let mut session = Session::new(&catalog, CheckoutRules::default());

        let result = session.add_to_cart("1", 0, None, None);

        assert!(matches!(
            result,
            Err(SessionError::Cart(CartError::InvalidQuantity(0)))
        ));

        Ok(())
    }

    #[test]
    fn place_order_clears_the_cart() -> TestResult {
        let catalog = catalog()?;
        let mut session = Session::new(&catalog, CheckoutRules::default());
        let mut rng = StdRng::seed_from_u64(7);

        session.add_to_cart("1", 1, None, None)?;

        let confirmation = session.place_order(ShippingMethod::Standard, &mut rng)?;

        assert_eq!(confirmation.item_count, 1);
        assert_eq!(confirmation.totals.total, Decimal::new(317_393, 4));
        assert!(session.cart().is_empty());

        let digits = confirmation
            .order_number
            .strip_prefix("ORD-")
            .ok_or("missing prefix")?;
        let number: u32 = digits.parse()?;

        assert!((100_000..=999_999).contains(&number));
        assert!((5..=7).contains(&confirmation.estimated_delivery_days));

        Ok(())
    }

    #[test]
    fn place_order_refuses_an_empty_cart() -> TestResult {
        let catalog = catalog()?;
        let mut session = Session::new(&catalog, CheckoutRules::default());
        let mut rng = StdRng::seed_from_u64(7);

        let result = session.place_order(ShippingMethod::Express, &mut rng);

        assert!(matches!(result, Err(SessionError::EmptyCart)));

        Ok(())
    }

    #[test]
    fn checkout_totals_follow_the_cart() -> TestResult {
        let catalog = catalog()?;
        let mut session = Session::new(&catalog, CheckoutRules::default());

        session.add_to_cart("2", 1, None, None)?;

        let totals = session.checkout_totals(ShippingMethod::Standard);

        assert_eq!(totals.shipping, Decimal::ZERO);
        assert_eq!(totals.subtotal, price(5999));

        session.update_quantity("2", 0)?;

        assert_eq!(session.checkout_totals(ShippingMethod::Standard).shipping, price(500));

        Ok(())
    }
}
