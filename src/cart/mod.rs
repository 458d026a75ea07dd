//! Cart
//!
//! The cart ledger holds the shopper's line items and their derived totals.
//! Every mutation goes through a [`CartCommand`] and [`CartState::apply`], which
//! builds the next state with totals recomputed from the lines, so a state with
//! stale totals is never observable.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::products::Product;

pub mod snapshot;

pub use snapshot::{CartSnapshot, LineSnapshot, SnapshotError};

/// Errors produced by cart commands.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Add was called with a quantity below one, or one too large to store.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Merging into an existing line would overflow its quantity.
    #[error("quantity overflow for product {0}")]
    QuantityOverflow(String),
}

/// A single cart entry: one product/size/color combination and its quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    product: &'a Product,
    quantity: u32,
    size: Option<String>,
    color: Option<String>,
}

impl<'a> CartLine<'a> {
    /// The product this line refers to.
    pub fn product(&self) -> &'a Product {
        self.product
    }

    /// Units of the product on this line, always at least one.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Selected size
    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    /// Selected color
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Effective unit price times quantity.
    pub fn line_total(&self) -> Decimal {
        self.product.effective_price() * Decimal::from(self.quantity)
    }

    /// Check if this line has the given identity key.
    fn is_keyed(&self, product_id: &str, size: Option<&str>, color: Option<&str>) -> bool {
        self.product.id == product_id && self.size() == size && self.color() == color
    }
}

/// A cart mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum CartCommand<'a> {
    /// Add units of a product, merging into the line with the same product,
    /// size and color if there is one.
    Add {
        /// Product to add
        product: &'a Product,
        /// Units to add, must be at least one
        quantity: i64,
        /// Selected size
        size: Option<String>,
        /// Selected color
        color: Option<String>,
    },

    /// Remove every line for a product, whatever its size or color.
    Remove {
        /// Product to remove
        product_id: String,
    },

    /// Set the quantity of the first line for a product. Zero or less removes
    /// every line for the product.
    UpdateQuantity {
        /// Product to update
        product_id: String,
        /// New quantity
        quantity: i64,
    },

    /// Empty the cart.
    Clear,
}

impl CartCommand<'_> {
    fn name(&self) -> &'static str {
        match self {
            CartCommand::Add { .. } => "add",
            CartCommand::Remove { .. } => "remove",
            CartCommand::UpdateQuantity { .. } => "update_quantity",
            CartCommand::Clear => "clear",
        }
    }
}

/// Cart lines in insertion order plus their cached totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState<'a> {
    lines: Vec<CartLine<'a>>,
    total_items: u64,
    total_price: Decimal,
}

impl<'a> CartState<'a> {
    /// An empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    fn from_lines(lines: Vec<CartLine<'a>>) -> Self {
        let total_items = lines.iter().map(|line| u64::from(line.quantity)).sum();
        let total_price = lines.iter().map(CartLine::line_total).sum();

        Self {
            lines,
            total_items,
            total_price,
        }
    }

    /// Compute the state that results from applying a command.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: an add with a quantity below one, or a
    ///   quantity that does not fit in a line.
    /// - [`CartError::QuantityOverflow`]: an add that would overflow the quantity
    ///   of the line it merges into.
    pub fn apply(&self, command: &CartCommand<'a>) -> Result<Self, CartError> {
        match command {
            CartCommand::Add {
                product,
                quantity,
                size,
                color,
            } => self.add(product, *quantity, size.as_deref(), color.as_deref()),
            CartCommand::Remove { product_id } => Ok(self.remove(product_id)),
            CartCommand::UpdateQuantity {
                product_id,
                quantity,
            } => self.update_quantity(product_id, *quantity),
            CartCommand::Clear => Ok(Self::new()),
        }
    }

    fn add(
        &self,
        product: &'a Product,
        quantity: i64,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Result<Self, CartError> {
        let quantity = line_quantity(quantity)?;
        let mut lines = self.lines.clone();

        if let Some(line) = lines
            .iter_mut()
            .find(|line| line.is_keyed(&product.id, size, color))
        {
            line.quantity = line
                .quantity
                .checked_add(quantity)
                .ok_or_else(|| CartError::QuantityOverflow(product.id.clone()))?;
        } else {
            lines.push(CartLine {
                product,
                quantity,
                size: size.map(str::to_string),
                color: color.map(str::to_string),
            });
        }

        Ok(Self::from_lines(lines))
    }

    fn remove(&self, product_id: &str) -> Self {
        let lines = self
            .lines
            .iter()
            .filter(|line| line.product.id != product_id)
            .cloned()
            .collect();

        Self::from_lines(lines)
    }

    fn update_quantity(&self, product_id: &str, quantity: i64) -> Result<Self, CartError> {
        if quantity <= 0 {
            return Ok(self.remove(product_id));
        }

        let Some(position) = self
            .lines
            .iter()
            .position(|line| line.product.id == product_id)
        else {
            return Ok(self.clone());
        };

        let quantity = line_quantity(quantity)?;
        let mut lines = self.lines.clone();

        if let Some(line) = lines.get_mut(position) {
            line.quantity = quantity;
        }

        Ok(Self::from_lines(lines))
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Sum of line quantities.
    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Sum of effective unit price times quantity, at full precision.
    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn line_quantity(quantity: i64) -> Result<u32, CartError> {
    if quantity < 1 {
        return Err(CartError::InvalidQuantity(quantity));
    }

    u32::try_from(quantity).map_err(|_err| CartError::InvalidQuantity(quantity))
}

/// Cart Ledger
///
/// Owns the authoritative [`CartState`] for one session. Commands that fail
/// leave the state untouched.
#[derive(Debug, Clone, Default)]
pub struct CartLedger<'a> {
    state: CartState<'a>,
}

impl<'a> CartLedger<'a> {
    /// Create a ledger with an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a command and return the new state.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the command is rejected, see [`CartState::apply`].
    pub fn dispatch(&mut self, command: &CartCommand<'a>) -> Result<&CartState<'a>, CartError> {
        let next = self.state.apply(command)?;

        debug!(
            command = command.name(),
            lines = next.lines.len(),
            total_items = next.total_items,
            total_price = %next.total_price,
            "cart updated"
        );

        self.state = next;

        Ok(&self.state)
    }

    /// Add units of a product.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if `quantity` is below one.
    pub fn add(
        &mut self,
        product: &'a Product,
        quantity: i64,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Result<&CartState<'a>, CartError> {
        self.dispatch(&CartCommand::Add {
            product,
            quantity,
            size: size.map(str::to_string),
            color: color.map(str::to_string),
        })
    }

    /// Remove every line for a product. Unknown products are ignored.
    pub fn remove(&mut self, product_id: &str) -> &CartState<'a> {
        self.state = self.state.remove(product_id);

        debug!(
            product_id,
            total_items = self.state.total_items,
            "cart line removed"
        );

        &self.state
    }

    /// Set the quantity of the first line for a product, or remove the product
    /// when `quantity` is zero or less.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if `quantity` does not fit in a line.
    pub fn update_quantity(
        &mut self,
        product_id: &str,
        quantity: i64,
    ) -> Result<&CartState<'a>, CartError> {
        self.dispatch(&CartCommand::UpdateQuantity {
            product_id: product_id.to_string(),
            quantity,
        })
    }

    /// Empty the cart.
    pub fn clear(&mut self) -> &CartState<'a> {
        self.state = CartState::new();

        debug!("cart cleared");

        &self.state
    }

    /// Current state.
    pub fn state(&self) -> &CartState<'a> {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test_support::{price, product};

    use super::*;

    fn recomputed(state: &CartState<'_>) -> (u64, Decimal) {
        let items = state.lines().iter().map(|l| u64::from(l.quantity())).sum();
        let price = state
            .lines()
            .iter()
            .map(|l| l.product().effective_price() * Decimal::from(l.quantity()))
            .sum();

        (items, price)
    }

    fn assert_consistent(state: &CartState<'_>) {
        assert_eq!(
            (state.total_items(), state.total_price()),
            recomputed(state),
            "cached totals diverged from lines"
        );
        assert!(
            state.lines().iter().all(|line| line.quantity() >= 1),
            "line with zero quantity retained"
        );
    }

    #[test]
    fn add_appends_new_lines_in_order() -> TestResult {
        let shirt = product("1", price(2999), Some(price(2499)));
        let jeans = product("2", price(5999), None);
        let mut ledger = CartLedger::new();

        ledger.add(&shirt, 1, Some("M"), Some("black"))?;
        let state = ledger.add(&jeans, 2, None, None)?;

        let ids: Vec<&str> = state.lines().iter().map(|l| l.product().id.as_str()).collect();

        assert_eq!(ids, ["1", "2"]);
        assert_eq!(state.total_items(), 3);
        assert_eq!(state.total_price(), price(2499) + price(5999) * Decimal::from(2));

        Ok(())
    }

    #[test]
    fn add_merges_lines_with_same_identity_key() -> TestResult {
        let shirt = product("1", price(2999), None);
        let mut ledger = CartLedger::new();

        ledger.add(&shirt, 2, Some("S"), Some("red"))?;
        let state = ledger.add(&shirt, 3, Some("S"), Some("red"))?;

        assert_eq!(state.lines().len(), 1);
        assert_eq!(state.lines().first().map(CartLine::quantity), Some(5));
        assert_consistent(state);

        Ok(())
    }

    #[test]
    fn add_keeps_variants_as_separate_lines() -> TestResult {
        let shirt = product("1", price(2999), None);
        let mut ledger = CartLedger::new();

        ledger.add(&shirt, 1, Some("S"), None)?;
        ledger.add(&shirt, 1, None, None)?;
        let state = ledger.add(&shirt, 1, Some("S"), Some("red"))?;

        assert_eq!(state.lines().len(), 3);

        Ok(())
    }

    #[test]
    fn add_rejects_quantity_below_one_and_leaves_cart_unchanged() -> TestResult {
        let shirt = product("1", price(2999), None);
        let mut ledger = CartLedger::new();
        ledger.add(&shirt, 1, None, None)?;
        let before = ledger.state().clone();

        assert_eq!(
            ledger.add(&shirt, 0, None, None).err(),
            Some(CartError::InvalidQuantity(0))
        );
        assert_eq!(
            ledger.add(&shirt, -2, None, None).err(),
            Some(CartError::InvalidQuantity(-2))
        );
        assert_eq!(ledger.state(), &before);

        Ok(())
    }

    #[test]
    fn add_rejects_merge_overflow() -> TestResult {
        let shirt = product("1", price(100), None);
        let mut ledger = CartLedger::new();
        ledger.add(&shirt, i64::from(u32::MAX), None, None)?;

        let result = ledger.add(&shirt, 1, None, None);

        assert_eq!(result.err(), Some(CartError::QuantityOverflow("1".to_string())));
        assert_eq!(ledger.state().total_items(), u64::from(u32::MAX));

        Ok(())
    }

    #[test]
    fn remove_drops_every_variant_of_the_product() -> TestResult {
        let shirt = product("1", price(2999), None);
        let jeans = product("2", price(5999), None);
        let mut ledger = CartLedger::new();
        ledger.add(&shirt, 1, Some("S"), Some("red"))?;
        ledger.add(&jeans, 1, None, None)?;
        ledger.add(&shirt, 1, Some("M"), Some("blue"))?;

        let state = ledger.remove("1");

        assert_eq!(state.lines().len(), 1);
        assert_eq!(state.total_items(), 1);
        assert_eq!(state.total_price(), price(5999));

        Ok(())
    }

    #[test]
    fn remove_unknown_product_is_a_no_op() -> TestResult {
        let shirt = product("1", price(2999), None);
        let mut ledger = CartLedger::new();
        ledger.add(&shirt, 2, None, None)?;
        let before = ledger.state().clone();

        assert_eq!(ledger.remove("missing"), &before);

        Ok(())
    }

    #[test]
    fn update_quantity_sets_first_matching_line_only() -> TestResult {
        let shirt = product("1", price(1000), None);
        let mut ledger = CartLedger::new();
        ledger.add(&shirt, 1, Some("S"), None)?;
        ledger.add(&shirt, 1, Some("M"), None)?;

        let state = ledger.update_quantity("1", 4)?;

        let quantities: Vec<u32> = state.lines().iter().map(CartLine::quantity).collect();

        assert_eq!(quantities, [4, 1]);
        assert_eq!(state.total_price(), price(5000));
        assert_consistent(state);

        Ok(())
    }

    #[test]
    fn update_quantity_to_zero_or_less_removes_like_remove() -> TestResult {
        let shirt = product("1", price(1000), None);
        let jeans = product("2", price(5999), None);
        let mut ledger = CartLedger::new();
        ledger.add(&shirt, 1, Some("S"), None)?;
        ledger.add(&shirt, 1, Some("M"), None)?;
        ledger.add(&jeans, 1, None, None)?;

        let mut removed = ledger.clone();
        let expected = removed.remove("1").clone();

        let mut zero = ledger.clone();
        let mut negative = ledger.clone();

        assert_eq!(zero.update_quantity("1", 0)?, &expected);
        assert_eq!(negative.update_quantity("1", -3)?, &expected);

        Ok(())
    }

    #[test]
    fn update_quantity_unknown_product_is_a_no_op() -> TestResult {
        let shirt = product("1", price(1000), None);
        let mut ledger = CartLedger::new();
        ledger.add(&shirt, 1, None, None)?;
        let before = ledger.state().clone();

        assert_eq!(ledger.update_quantity("missing", 7)?, &before);

        Ok(())
    }

    #[test]
    fn update_quantity_unknown_product_ignores_quantity_range() -> TestResult {
        let shirt = product("1", price(1000), None);
        let mut ledger = CartLedger::new();
        ledger.add(&shirt, 1, None, None)?;
        let before = ledger.state().clone();

        assert_eq!(ledger.update_quantity("missing", 5_000_000_000)?, &before);

        Ok(())
    }

    #[test]
    fn update_quantity_rejects_oversized_quantity_for_known_product() -> TestResult {
        let shirt = product("1", price(1000), None);
        let mut ledger = CartLedger::new();
        ledger.add(&shirt, 2, None, None)?;

        let result = ledger.update_quantity("1", 5_000_000_000);

        assert_eq!(result, Err(CartError::InvalidQuantity(5_000_000_000)));
        assert_eq!(ledger.state().total_items(), 2);

        Ok(())
    }

    #[test]
    fn dispatch_applies_borrowed_commands() -> TestResult {
        let shirt = product("1", price(1000), None);
        let mut ledger = CartLedger::new();
        let command = CartCommand::Add {
            product: &shirt,
            quantity: 3,
            size: None,
            color: None,
        };

        ledger.dispatch(&command)?;
        ledger.dispatch(&command)?;

        assert_eq!(ledger.state().total_items(), 6);
        assert_eq!(ledger.dispatch(&CartCommand::Clear)?, &CartState::new());

        Ok(())
    }

    #[test]
    fn clear_on_empty_cart_is_idempotent() {
        let mut ledger = CartLedger::new();

        let once = ledger.clear().clone();
        let twice = ledger.clear();

        assert_eq!(&once, twice);
        assert_eq!(twice.total_items(), 0);
        assert_eq!(twice.total_price(), Decimal::ZERO);
    }

    #[test]
    fn totals_stay_consistent_across_command_sequences() -> TestResult {
        let products = [
            product("1", price(2999), Some(price(2499))),
            product("2", price(5999), None),
            product("3", price(4999), Some(price(3999))),
        ];
        let mut ledger = CartLedger::new();

        for (step, product) in products.iter().cycle().take(12).enumerate() {
            let size = if step % 2 == 0 { Some("S") } else { Some("M") };
            let quantity = i64::try_from(step % 3 + 1)?;

            ledger.add(product, quantity, size, None)?;
            assert_consistent(ledger.state());

            if step % 4 == 3 {
                ledger.update_quantity(&product.id, quantity - 2)?;
                assert_consistent(ledger.state());
            }

            if step % 5 == 4 {
                ledger.remove(&product.id);
                assert_consistent(ledger.state());
            }
        }

        ledger.clear();
        assert_consistent(ledger.state());
        assert!(ledger.state().is_empty());

        Ok(())
    }

    #[test]
    fn apply_is_pure() -> TestResult {
        let shirt = product("1", price(2999), None);
        let empty = CartState::new();

        let next = empty.apply(&CartCommand::Add {
            product: &shirt,
            quantity: 1,
            size: None,
            color: None,
        })?;

        assert!(empty.is_empty());
        assert_eq!(next.total_items(), 1);

        Ok(())
    }
}
