//! Fixtures
//!
//! YAML product catalogs for demos and tests, so neither needs a live
//! backend. Loaded products get generated ids and fresh timestamps; the
//! fixture file only declares what a shopkeeper would actually type in.

use std::{fs, path::PathBuf};

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::products::{Product, ProductError};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A fixture product failed catalog validation
    #[error("Invalid fixture product: {0}")]
    InvalidProduct(#[from] ProductError),
}

#[derive(Debug, Deserialize)]
struct CatalogFixture {
    products: FxHashMap<String, ProductFixture>,
}

#[derive(Debug, Deserialize)]
struct ProductFixture {
    code: String,
    name: String,
    category: String,
    unit: String,
    purchase_price: u64,
    selling_price: u64,
    stock: u32,
    min_stock: u32,
    #[serde(default)]
    barcode: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl ProductFixture {
    fn into_product(self) -> Product {
        let now = Timestamp::now();

        Product {
            id: Uuid::now_v7().to_string(),
            code: self.code,
            name: self.name,
            category: self.category,
            unit: self.unit,
            purchase_price: self.purchase_price,
            selling_price: self.selling_price,
            stock: self.stock,
            min_stock: self.min_stock,
            barcode: self.barcode,
            description: self.description,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Loaded products, in no particular order
    products: Vec<Product>,

    /// Fixture key -> products index, for lookups
    product_keys: FxHashMap<String, usize>,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Create a new empty fixture with default base path
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    #[must_use]
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: Vec::new(),
            product_keys: FxHashMap::default(),
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a product
    /// in it fails validation.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CatalogFixture = serde_norway::from_str(&contents)?;

        for (key, product_fixture) in fixture.products {
            let product = product_fixture.into_product();

            product.validate()?;

            self.product_keys.insert(key, self.products.len());
            self.products.push(product);
        }

        Ok(self)
    }

    /// The loaded products.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a loaded product by its fixture key.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::ProductNotFound`] for an unknown key.
    pub fn product(&self, key: &str) -> Result<&Product, FixtureError> {
        self.product_keys
            .get(key)
            .and_then(|&index| self.products.get(index))
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }
}
