//! HTTP backend client
//!
//! `reqwest` implementation of [`TransactionBackend`] against the backend's
//! JSON API. List endpoints wrap their collections in envelope objects;
//! submission returns a `{success, transaction, message}` envelope.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    products::Product,
    stock::StockLog,
    transactions::{FinalizedTransaction, PersistedTransaction},
};

use super::{BackendError, TransactionBackend};

/// HTTP client for the transaction backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    http: Client,
}

impl HttpBackend {
    /// Create a client for the backend at `base_url` (no trailing slash).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, BackendError> {
        let url = format!("{}{path}", self.base_url);
        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(BackendError::Rejected(format!(
                "{path} failed with status {status}: {text}"
            )));
        }

        Ok(response.json().await?)
    }
}

#[derive(Debug, Deserialize)]
struct ProductsEnvelope {
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct TransactionsEnvelope {
    #[serde(default)]
    transactions: Vec<PersistedTransaction>,
}

#[derive(Debug, Deserialize)]
struct StockLogsEnvelope {
    #[serde(default)]
    stock_logs: Vec<StockLog>,
}

#[derive(Debug, Deserialize)]
struct SubmitEnvelope {
    success: bool,
    transaction: Option<PersistedTransaction>,
    message: Option<String>,
}

#[async_trait]
impl TransactionBackend for HttpBackend {
    async fn submit_transaction(
        &self,
        transaction: &FinalizedTransaction,
    ) -> Result<PersistedTransaction, BackendError> {
        let url = format!("{}/api/transactions", self.base_url);
        let response = self.http.post(&url).json(transaction).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(BackendError::Rejected(format!(
                "submission failed with status {status}: {text}"
            )));
        }

        let envelope: SubmitEnvelope = response.json().await?;

        if !envelope.success {
            return Err(BackendError::Rejected(
                envelope.message.unwrap_or_else(|| "transaction failed".to_string()),
            ));
        }

        envelope.transaction.ok_or_else(|| {
            BackendError::Rejected("success response carried no transaction".to_string())
        })
    }

    async fn list_products(&self) -> Result<Vec<Product>, BackendError> {
        let envelope: ProductsEnvelope = self.get_json("/api/products").await?;

        Ok(envelope.products)
    }

    async fn list_transactions(&self) -> Result<Vec<PersistedTransaction>, BackendError> {
        let envelope: TransactionsEnvelope = self.get_json("/api/transactions").await?;

        Ok(envelope.transactions)
    }

    async fn list_stock_logs(&self) -> Result<Vec<StockLog>, BackendError> {
        let envelope: StockLogsEnvelope = self.get_json("/api/stock-logs").await?;

        Ok(envelope.stock_logs)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn submit_envelope_tolerates_missing_optionals() -> TestResult {
        let envelope: SubmitEnvelope = serde_json::from_str(r#"{"success": false}"#)?;

        assert!(!envelope.success);
        assert!(envelope.transaction.is_none());
        assert!(envelope.message.is_none());

        Ok(())
    }

    #[test]
    fn list_envelopes_default_to_empty_collections() -> TestResult {
        let products: ProductsEnvelope = serde_json::from_str("{}")?;
        let transactions: TransactionsEnvelope = serde_json::from_str("{}")?;
        let stock_logs: StockLogsEnvelope = serde_json::from_str("{}")?;

        assert!(products.products.is_empty());
        assert!(transactions.transactions.is_empty());
        assert!(stock_logs.stock_logs.is_empty());

        Ok(())
    }
}
