//! Products
//!
//! Catalog records as served by the backend, plus the pure read-side helpers
//! the UI pages need: lookup, search, stock filters, recent listings. The
//! catalog itself is never mutated here; restocks and new products are
//! backend writes.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from validating product input before it is sent to the backend.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductError {
    /// A required text field was empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The selling price does not cover the purchase price.
    #[error("selling price {selling_price} is below purchase price {purchase_price}")]
    PriceBelowCost {
        /// Proposed selling price in minor units.
        selling_price: u64,

        /// Purchase price in minor units.
        purchase_price: u64,
    },
}

/// Stock level relative to the product's configured minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    /// No stock left.
    Empty,

    /// At or below the minimum stock level.
    Low,

    /// Above the minimum stock level.
    Normal,
}

/// A catalog product.
///
/// Prices are integer minor units of the session currency. `category` and
/// `unit` are opaque keys; mapping them to display labels is a presentation
/// concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Server-assigned identifier.
    pub id: String,

    /// Human-facing product code (e.g. `PRD123456001`).
    pub code: String,

    /// Product name.
    pub name: String,

    /// Category key.
    pub category: String,

    /// Sales unit (e.g. `pcs`).
    pub unit: String,

    /// Purchase price in minor units.
    pub purchase_price: u64,

    /// Selling price in minor units.
    pub selling_price: u64,

    /// Units currently in stock.
    pub stock: u32,

    /// Minimum stock level before the product counts as low.
    pub min_stock: u32,

    /// Optional barcode.
    #[serde(default)]
    pub barcode: Option<String>,

    /// Optional free-text description.
    #[serde(default)]
    pub description: Option<String>,

    /// Creation timestamp.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,
}

impl Product {
    /// Stock level relative to `min_stock`.
    #[must_use]
    pub fn stock_status(&self) -> StockStatus {
        if self.stock == 0 {
            StockStatus::Empty
        } else if self.stock <= self.min_stock {
            StockStatus::Low
        } else {
            StockStatus::Normal
        }
    }

    /// Validate the record before submitting it to the backend.
    ///
    /// # Errors
    ///
    /// Returns a [`ProductError`] if a required field is empty or the selling
    /// price is below the purchase price.
    pub fn validate(&self) -> Result<(), ProductError> {
        for (value, field) in [
            (&self.code, "product code"),
            (&self.name, "product name"),
            (&self.category, "category"),
            (&self.unit, "unit"),
        ] {
            if value.trim().is_empty() {
                return Err(ProductError::MissingField(field));
            }
        }

        if self.selling_price < self.purchase_price {
            return Err(ProductError::PriceBelowCost {
                selling_price: self.selling_price,
                purchase_price: self.purchase_price,
            });
        }

        Ok(())
    }

    /// Case-insensitive match against name and category.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();

        self.name.to_lowercase().contains(&term) || self.category.to_lowercase().contains(&term)
    }
}

/// Find a product by its server identifier.
#[must_use]
pub fn find<'a>(products: &'a [Product], id: &str) -> Option<&'a Product> {
    products.iter().find(|p| p.id == id)
}

/// Filter products matching a search term (name or category).
#[must_use]
pub fn search<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    let term = term.trim();

    if term.is_empty() {
        return products.iter().collect();
    }

    products.iter().filter(|p| p.matches(term)).collect()
}

/// Products at or below their minimum stock level but not yet empty.
#[must_use]
pub fn low_stock(products: &[Product]) -> Vec<&Product> {
    products
        .iter()
        .filter(|p| p.stock_status() == StockStatus::Low)
        .collect()
}

/// Products with no stock left.
#[must_use]
pub fn out_of_stock(products: &[Product]) -> Vec<&Product> {
    products
        .iter()
        .filter(|p| p.stock_status() == StockStatus::Empty)
        .collect()
}

/// The `n` most recently created products, newest first.
#[must_use]
pub fn most_recent(products: &[Product], n: usize) -> Vec<&Product> {
    let mut sorted: Vec<&Product> = products.iter().collect();

    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(n);

    sorted
}
