//! Stock
//!
//! Restock history records and restock planning. The core only *plans*
//! restocks, building the request values the UI submits through the
//! backend, and reads the log history. Stock levels themselves live in the
//! catalog and are adjusted server-side.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::products::Product;

/// Errors from building a restock request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RestockError {
    /// Restock quantity must be at least one unit.
    #[error("restock quantity must be positive")]
    ZeroQuantity,

    /// Purchase price must be positive.
    #[error("restock price must be positive")]
    ZeroPrice,
}

/// One restock event as recorded by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockLog {
    /// Server-assigned identifier.
    pub id: String,

    /// The product restocked.
    pub product_id: String,

    /// Units added.
    pub quantity: u32,

    /// Purchase price per unit, in minor units.
    pub price: u64,

    /// Supplier, if recorded.
    #[serde(default)]
    pub supplier: Option<String>,

    /// Free-text notes, if recorded.
    #[serde(default)]
    pub notes: Option<String>,

    /// `quantity * price`.
    pub total_cost: u64,

    /// Server-assigned creation timestamp.
    pub created_at: Timestamp,
}

/// The `n` most recent restock events, newest first.
#[must_use]
pub fn most_recent(logs: &[StockLog], n: usize) -> Vec<&StockLog> {
    let mut sorted: Vec<&StockLog> = logs.iter().collect();

    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(n);

    sorted
}

/// A manual restock request, ready for submission to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestockRequest {
    /// The product to restock.
    pub product_id: String,

    /// Units to add.
    pub quantity: u32,

    /// Purchase price per unit, in minor units.
    pub price: u64,

    /// Supplier, if known.
    pub supplier: Option<String>,

    /// Free-text notes.
    pub notes: Option<String>,

    /// `quantity * price`.
    pub total_cost: u64,
}

impl RestockRequest {
    /// Build a request for `quantity` units of `product` at `price` per
    /// unit.
    ///
    /// # Errors
    ///
    /// Returns a [`RestockError`] when quantity or price is zero.
    pub fn new(product: &Product, quantity: u32, price: u64) -> Result<Self, RestockError> {
        if quantity == 0 {
            return Err(RestockError::ZeroQuantity);
        }

        if price == 0 {
            return Err(RestockError::ZeroPrice);
        }

        Ok(Self {
            product_id: product.id.clone(),
            quantity,
            price,
            supplier: None,
            notes: None,
            total_cost: u64::from(quantity) * price,
        })
    }

    /// Attach a supplier.
    #[must_use]
    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    /// Attach notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Which products an auto-restock run should cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestockThreshold {
    /// Products at or below their own configured minimum (out-of-stock
    /// included).
    AtMinimum,

    /// Products at or below a fixed stock level.
    Level(u32),
}

impl RestockThreshold {
    fn includes(self, product: &Product) -> bool {
        match self {
            Self::AtMinimum => product.stock <= product.min_stock,
            Self::Level(level) => product.stock <= level,
        }
    }
}

/// How many units an auto-restock run should order per product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestockAmount {
    /// Bring stock back up to the product's configured minimum.
    ToMinimum,

    /// Order a fixed number of units regardless of current stock.
    Fixed(u32),
}

impl RestockAmount {
    fn units_for(self, product: &Product) -> u32 {
        match self {
            Self::ToMinimum => product.min_stock.saturating_sub(product.stock),
            Self::Fixed(units) => units,
        }
    }
}

/// One line of an auto-restock preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestockPlan<'a> {
    /// The product needing restock.
    pub product: &'a Product,

    /// Units to order.
    pub quantity: u32,

    /// `quantity * purchase_price`.
    pub total_cost: u64,
}

/// Preview an auto-restock run: every product selected by `threshold` gets a
/// plan line sized by `amount`. Products whose computed quantity is zero are
/// skipped (already at their minimum under [`RestockAmount::ToMinimum`]).
#[must_use]
pub fn preview_auto_restock<'a>(
    products: &'a [Product],
    threshold: RestockThreshold,
    amount: RestockAmount,
) -> Vec<RestockPlan<'a>> {
    products
        .iter()
        .filter(|p| threshold.includes(p))
        .filter_map(|product| {
            let quantity = amount.units_for(product);

            (quantity > 0).then(|| RestockPlan {
                product,
                quantity,
                total_cost: u64::from(quantity) * product.purchase_price,
            })
        })
        .collect()
}
