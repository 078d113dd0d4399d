//! Cart
//!
//! The in-progress, not-yet-paid set of items a session intends to purchase.
//! A cart holds at most one line per product; repeated adds increment the
//! existing line. Every line carries price and stock snapshots taken at
//! add-time, and every quantity edit is bounded by the snapshotted stock
//! ceiling. Line totals are derived and recomputed on every mutation, never
//! stored independently of their inputs.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::products::Product;

/// Errors from cart mutations. Every error leaves the cart unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The product has no stock left.
    #[error("{name} is out of stock")]
    OutOfStock {
        /// Product name, for the caller's message.
        name: String,
    },

    /// The requested quantity would exceed the line's stock ceiling.
    #[error("not enough stock of {name}: {available} available")]
    InsufficientStock {
        /// Product name, for the caller's message.
        name: String,

        /// The line's stock ceiling.
        available: u32,
    },

    /// A quantity edit outside `1..=stock_ceiling`.
    #[error("quantity must be between 1 and {ceiling}, got {requested}")]
    InvalidQuantity {
        /// The rejected quantity.
        requested: u32,

        /// The line's stock ceiling.
        ceiling: u32,
    },
}

/// One product's row within a cart.
///
/// `unit_price` and `stock_ceiling` are snapshots of the catalog at the time
/// the line was created; later catalog changes do not affect an open cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "id")]
    line_id: Uuid,
    product_id: String,
    name: String,
    category: String,
    unit: String,
    #[serde(rename = "price")]
    unit_price: u64,
    quantity: u32,
    #[serde(rename = "total")]
    line_total: u64,
    #[serde(rename = "stock")]
    stock_ceiling: u32,
}

impl CartLine {
    fn new(product: &Product, quantity: u32) -> Self {
        let unit_price = product.selling_price;

        Self {
            line_id: Uuid::now_v7(),
            product_id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            unit: product.unit.clone(),
            unit_price,
            quantity,
            line_total: line_total(quantity, unit_price),
            stock_ceiling: product.stock,
        }
    }

    /// Stable, client-generated line identifier.
    #[must_use]
    pub fn line_id(&self) -> Uuid {
        self.line_id
    }

    /// The catalog product this line refers to.
    #[must_use]
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Product name snapshot.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category key snapshot.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Sales unit snapshot.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Selling price per unit at add-time, in minor units.
    #[must_use]
    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }

    /// Current quantity, always within `1..=stock_ceiling`.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Derived `quantity * unit_price`.
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.line_total
    }

    /// Stock available at add-time; the upper bound for quantity edits.
    #[must_use]
    pub fn stock_ceiling(&self) -> u32 {
        self.stock_ceiling
    }

    fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.line_total = line_total(quantity, self.unit_price);
    }
}

fn line_total(quantity: u32, unit_price: u64) -> u64 {
    u64::from(quantity) * unit_price
}

/// Ordered sequence of cart lines. Insertion order is meaningful for display
/// only, not for totals.
///
/// Serializes transparently as an array of lines, so a persisted cart is the
/// same JSON blob whether stored alone or embedded in a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines (distinct products).
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines, for the cart badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(CartLine::quantity).sum()
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up a line by its identifier.
    #[must_use]
    pub fn line(&self, line_id: Uuid) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.line_id == line_id)
    }

    /// Look up a line by the product it refers to.
    #[must_use]
    pub fn line_for_product(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    /// Add `requested` units of a product.
    ///
    /// If a line for the product already exists its quantity is increased;
    /// otherwise a new line is created with price and stock snapshots taken
    /// from the catalog record. Returns the id of the affected line.
    ///
    /// # Errors
    ///
    /// - [`CartError::OutOfStock`] if the product has no stock.
    /// - [`CartError::InvalidQuantity`] if `requested` is zero.
    /// - [`CartError::InsufficientStock`] if the resulting quantity would
    ///   exceed the line's stock ceiling. The line is left unchanged.
    pub fn add_item(&mut self, product: &Product, requested: u32) -> Result<Uuid, CartError> {
        if product.stock == 0 {
            return Err(CartError::OutOfStock {
                name: product.name.clone(),
            });
        }

        if requested == 0 {
            return Err(CartError::InvalidQuantity {
                requested,
                ceiling: product.stock,
            });
        }

        if let Some(existing) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            let new_quantity = existing.quantity.saturating_add(requested);

            if new_quantity > existing.stock_ceiling {
                return Err(CartError::InsufficientStock {
                    name: existing.name.clone(),
                    available: existing.stock_ceiling,
                });
            }

            existing.set_quantity(new_quantity);

            return Ok(existing.line_id);
        }

        if requested > product.stock {
            return Err(CartError::InsufficientStock {
                name: product.name.clone(),
                available: product.stock,
            });
        }

        let line = CartLine::new(product, requested);
        let line_id = line.line_id;

        self.lines.push(line);

        Ok(line_id)
    }

    /// Set a line's quantity.
    ///
    /// A missing line is a no-op, mirroring [`Cart::remove_line`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] when `quantity` is outside
    /// `1..=stock_ceiling`; the line keeps its previous quantity.
    pub fn set_quantity(&mut self, line_id: Uuid, quantity: u32) -> Result<(), CartError> {
        let Some(line) = self.lines.iter_mut().find(|l| l.line_id == line_id) else {
            return Ok(());
        };

        if quantity == 0 || quantity > line.stock_ceiling {
            return Err(CartError::InvalidQuantity {
                requested: quantity,
                ceiling: line.stock_ceiling,
            });
        }

        line.set_quantity(quantity);

        Ok(())
    }

    /// Increase a line's quantity by one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InsufficientStock`] when the line is already at
    /// its stock ceiling.
    pub fn increment(&mut self, line_id: Uuid) -> Result<(), CartError> {
        let Some(line) = self.lines.iter_mut().find(|l| l.line_id == line_id) else {
            return Ok(());
        };

        if line.quantity >= line.stock_ceiling {
            return Err(CartError::InsufficientStock {
                name: line.name.clone(),
                available: line.stock_ceiling,
            });
        }

        line.set_quantity(line.quantity + 1);

        Ok(())
    }

    /// Decrease a line's quantity by one. At quantity 1 this is a no-op; a
    /// line leaves the cart only through [`Cart::remove_line`].
    pub fn decrement(&mut self, line_id: Uuid) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.line_id == line_id)
            && line.quantity > 1
        {
            line.set_quantity(line.quantity - 1);
        }
    }

    /// Remove a line unconditionally. No-op if absent.
    pub fn remove_line(&mut self, line_id: Uuid) {
        self.lines.retain(|l| l.line_id != line_id);
    }

    /// Empty the cart. No-op if already empty.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use super::*;

    fn product(id: &str, stock: u32, selling_price: u64) -> Product {
        Product {
            id: id.to_string(),
            code: format!("PRD-{id}"),
            name: format!("Product {id}"),
            category: "makanan".to_string(),
            unit: "pcs".to_string(),
            purchase_price: selling_price / 2,
            selling_price,
            stock,
            min_stock: 2,
            barcode: None,
            description: None,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn add_item_creates_line_with_snapshots() -> TestResult {
        let mut cart = Cart::new();
        let p = product("P1", 5, 10_000);

        let line_id = cart.add_item(&p, 1)?;
        let line = cart.line(line_id).ok_or("line missing")?;

        assert_eq!(line.product_id(), "P1");
        assert_eq!(line.quantity(), 1);
        assert_eq!(line.unit_price(), 10_000);
        assert_eq!(line.line_total(), 10_000);
        assert_eq!(line.stock_ceiling(), 5);

        Ok(())
    }

    #[test]
    fn add_item_merges_repeat_adds_into_one_line() -> TestResult {
        let mut cart = Cart::new();
        let p = product("P1", 5, 10_000);

        let first = cart.add_item(&p, 1)?;
        let second = cart.add_item(&p, 1)?;

        assert_eq!(first, second, "repeat add should touch the same line");
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 2);

        let line = cart.line(first).ok_or("line missing")?;

        assert_eq!(line.line_total(), 20_000);

        Ok(())
    }

    #[test]
    fn add_item_out_of_stock_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        let p = product("P1", 0, 10_000);

        let result = cart.add_item(&p, 1);

        assert!(matches!(result, Err(CartError::OutOfStock { .. })), "got {result:?}");
        assert!(cart.is_empty());
    }

    #[test]
    fn add_item_rejects_exceeding_stock_ceiling() -> TestResult {
        let mut cart = Cart::new();
        let p = product("P1", 2, 10_000);

        let line_id = cart.add_item(&p, 2)?;
        let result = cart.add_item(&p, 1);

        assert_eq!(
            result,
            Err(CartError::InsufficientStock {
                name: "Product P1".to_string(),
                available: 2,
            })
        );

        let line = cart.line(line_id).ok_or("line missing")?;

        assert_eq!(line.quantity(), 2, "rejected add must not change the line");

        Ok(())
    }

    #[test]
    fn add_item_rejects_new_line_over_stock() {
        let mut cart = Cart::new();
        let p = product("P1", 3, 10_000);

        let result = cart.add_item(&p, 4);

        assert!(
            matches!(result, Err(CartError::InsufficientStock { available: 3, .. })),
            "got {result:?}"
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn add_item_rejects_zero_quantity() {
        let mut cart = Cart::new();
        let p = product("P1", 3, 10_000);

        let result = cart.add_item(&p, 0);

        assert!(matches!(result, Err(CartError::InvalidQuantity { requested: 0, .. })), "got {result:?}");
    }

    #[test]
    fn set_quantity_recomputes_line_total() -> TestResult {
        let mut cart = Cart::new();
        let line_id = cart.add_item(&product("P1", 5, 10_000), 1)?;

        cart.set_quantity(line_id, 5)?;

        let line = cart.line(line_id).ok_or("line missing")?;

        assert_eq!(line.quantity(), 5);
        assert_eq!(line.line_total(), 50_000);

        Ok(())
    }

    #[test]
    fn set_quantity_out_of_range_leaves_line_unchanged() -> TestResult {
        let mut cart = Cart::new();
        let line_id = cart.add_item(&product("P1", 5, 10_000), 1)?;

        cart.set_quantity(line_id, 5)?;

        for bad in [0, 6] {
            let result = cart.set_quantity(line_id, bad);

            assert_eq!(
                result,
                Err(CartError::InvalidQuantity {
                    requested: bad,
                    ceiling: 5,
                })
            );
        }

        let line = cart.line(line_id).ok_or("line missing")?;

        assert_eq!(line.quantity(), 5);

        Ok(())
    }

    #[test]
    fn set_quantity_missing_line_is_noop() -> TestResult {
        let mut cart = Cart::new();

        cart.set_quantity(Uuid::now_v7(), 3)?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn increment_stops_at_stock_ceiling() -> TestResult {
        let mut cart = Cart::new();
        let line_id = cart.add_item(&product("P1", 2, 10_000), 2)?;

        let result = cart.increment(line_id);

        assert!(matches!(result, Err(CartError::InsufficientStock { .. })), "got {result:?}");

        Ok(())
    }

    #[test]
    fn decrement_stops_at_one() -> TestResult {
        let mut cart = Cart::new();
        let line_id = cart.add_item(&product("P1", 5, 10_000), 2)?;

        cart.decrement(line_id);
        cart.decrement(line_id);

        let line = cart.line(line_id).ok_or("line missing")?;

        assert_eq!(line.quantity(), 1, "decrement below one must be a no-op");

        Ok(())
    }

    #[test]
    fn remove_line_deletes_and_tolerates_missing() -> TestResult {
        let mut cart = Cart::new();
        let line_id = cart.add_item(&product("P1", 5, 10_000), 1)?;

        cart.remove_line(line_id);
        cart.remove_line(line_id);

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn clear_empties_the_cart() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(&product("P1", 5, 10_000), 1)?;
        cart.add_item(&product("P2", 5, 2_000), 1)?;

        cart.clear();
        cart.clear();

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn distinct_products_get_distinct_lines_and_unique_ids() -> TestResult {
        let mut cart = Cart::new();

        let a = cart.add_item(&product("P1", 5, 10_000), 1)?;
        let b = cart.add_item(&product("P2", 5, 2_000), 1)?;
        let c = cart.add_item(&product("P3", 5, 1_500), 1)?;

        assert_eq!(cart.len(), 3);
        assert!(a != b && b != c && a != c, "line ids must be unique");
        assert_eq!(cart.item_count(), 3);

        Ok(())
    }

    #[test]
    fn cart_serde_round_trip_is_identical() -> TestResult {
        let mut cart = Cart::new();

        cart.add_item(&product("P1", 5, 10_000), 2)?;
        cart.add_item(&product("P2", 9, 2_000), 3)?;

        let json = serde_json::to_string(&cart)?;
        let restored: Cart = serde_json::from_str(&json)?;

        assert_eq!(restored, cart, "round-trip must preserve ids, quantities, totals");
        assert!(json.starts_with('['), "cart must serialize as a plain array");

        Ok(())
    }
}
