//! Transaction backend
//!
//! The remote API boundary. The core submits finalized transactions and
//! consumes three read-only listings (products, transactions, stock logs);
//! it never writes to those collections directly. A rejection envelope
//! (`success: false`) is an error exactly like a transport failure, so
//! callers treat "not committed" uniformly and never clear the cart on it.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::{
    products::Product,
    stock::StockLog,
    transactions::{FinalizedTransaction, PersistedTransaction},
};

pub mod http;

/// Errors from talking to the backend. None of these commit anything; the
/// caller may re-invoke the same operation.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport or response-decoding failure.
    #[error("backend unavailable")]
    Unavailable(#[from] reqwest::Error),

    /// The backend answered but refused the request.
    #[error("backend rejected the request: {0}")]
    Rejected(String),
}

/// The remote transaction API.
#[automock]
#[async_trait]
pub trait TransactionBackend: Send + Sync {
    /// Submit a finalized transaction and return the persisted record.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the backend is unreachable or refuses
    /// the transaction. An `Err` of any kind means it is not committed.
    async fn submit_transaction(
        &self,
        transaction: &FinalizedTransaction,
    ) -> Result<PersistedTransaction, BackendError>;

    /// Fetch the product catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the backend is unreachable or answers
    /// with an error.
    async fn list_products(&self) -> Result<Vec<Product>, BackendError>;

    /// Fetch the transaction history.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the backend is unreachable or answers
    /// with an error.
    async fn list_transactions(&self) -> Result<Vec<PersistedTransaction>, BackendError>;

    /// Fetch the restock history.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the backend is unreachable or answers
    /// with an error.
    async fn list_stock_logs(&self) -> Result<Vec<StockLog>, BackendError>;
}
