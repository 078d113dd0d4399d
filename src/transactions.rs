//! Transactions
//!
//! Value objects exchanged with the transaction backend: the outbound
//! [`FinalizedTransaction`] built from a cart at payment time, and the
//! [`PersistedTransaction`] record the backend returns with server-assigned
//! fields. Field names on the wire match the backend's JSON.

use jiff::{Timestamp, Zoned};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash; the only method with change handling.
    Cash,

    /// Debit/credit card.
    Card,

    /// QRIS wallet payment.
    Qris,

    /// Bank transfer.
    Transfer,
}

impl PaymentMethod {
    /// Whether this method settles in physical cash.
    #[must_use]
    pub fn is_cash(self) -> bool {
        matches!(self, Self::Cash)
    }
}

/// Lifecycle status of a transaction. This client only ever produces
/// `completed`; the variant exists so the wire field round-trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Paid and recorded.
    Completed,
}

/// Immutable snapshot of one cart line at payment time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSnapshot {
    /// The catalog product sold.
    pub product_id: String,

    /// Product name at sale time.
    pub name: String,

    /// Units sold.
    pub quantity: u32,

    /// Price per unit in minor units.
    #[serde(rename = "price")]
    pub unit_price: u64,

    /// `quantity * unit_price`.
    #[serde(rename = "total")]
    pub line_total: u64,

    /// Category key at sale time.
    pub category: String,
}

/// A finalized transaction, ready for submission.
///
/// Built once from a cart by [`crate::checkout::finalize`] and never mutated
/// afterwards: it is submitted and then discarded from local state in favor
/// of the [`PersistedTransaction`] the backend returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalizedTransaction {
    transaction_code: String,
    items: Vec<LineSnapshot>,
    subtotal: u64,
    discount: u64,
    total: u64,
    payment_method: PaymentMethod,
    cash_received: u64,
    change: u64,
    status: TransactionStatus,
}

impl FinalizedTransaction {
    pub(crate) fn new(
        transaction_code: String,
        items: Vec<LineSnapshot>,
        subtotal: u64,
        discount: u64,
        total: u64,
        payment_method: PaymentMethod,
        cash_received: u64,
        change: u64,
    ) -> Self {
        Self {
            transaction_code,
            items,
            subtotal,
            discount,
            total,
            payment_method,
            cash_received,
            change,
            status: TransactionStatus::Completed,
        }
    }

    /// Client-generated transaction code.
    #[must_use]
    pub fn transaction_code(&self) -> &str {
        &self.transaction_code
    }

    /// The line snapshots, in cart order.
    #[must_use]
    pub fn items(&self) -> &[LineSnapshot] {
        &self.items
    }

    /// Sum of line totals in minor units.
    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.subtotal
    }

    /// Discount applied (currently always zero).
    #[must_use]
    pub fn discount(&self) -> u64 {
        self.discount
    }

    /// Amount due in minor units.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// The payment method used.
    #[must_use]
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Cash handed over; zero for non-cash methods.
    #[must_use]
    pub fn cash_received(&self) -> u64 {
        self.cash_received
    }

    /// Change due back; zero for non-cash methods.
    #[must_use]
    pub fn change(&self) -> u64 {
        self.change
    }

    /// Lifecycle status (always `completed`).
    #[must_use]
    pub fn status(&self) -> TransactionStatus {
        self.status
    }
}

/// A transaction as recorded by the backend, with server-assigned fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedTransaction {
    /// Server-assigned identifier.
    pub id: String,

    /// Client-generated transaction code.
    pub transaction_code: String,

    /// The line snapshots, in cart order.
    pub items: Vec<LineSnapshot>,

    /// Sum of line totals in minor units.
    pub subtotal: u64,

    /// Discount applied.
    pub discount: u64,

    /// Amount due in minor units.
    pub total: u64,

    /// The payment method used.
    pub payment_method: PaymentMethod,

    /// Cash handed over; zero for non-cash methods.
    pub cash_received: u64,

    /// Change due back; zero for non-cash methods.
    pub change: u64,

    /// Lifecycle status.
    pub status: TransactionStatus,

    /// Server-assigned creation timestamp.
    pub created_at: Timestamp,
}

/// Generate a transaction code: `TRX`, the local date as `yymmdd`, and a
/// three-digit random suffix.
#[must_use]
pub fn transaction_code(now: &Zoned) -> String {
    let date = now.strftime("%y%m%d");
    let suffix: u16 = rand::thread_rng().gen_range(0..1000);

    format!("TRX{date}{suffix:03}")
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn transaction_code_embeds_local_date() -> TestResult {
        let now: Zoned = "2026-08-27T14:30:00+07:00[Asia/Jakarta]".parse()?;

        let code = transaction_code(&now);

        assert_eq!(code.len(), 12, "TRX + yymmdd + 3 digits");
        assert!(code.starts_with("TRX260827"), "got {code}");

        Ok(())
    }

    #[test]
    fn payment_method_serializes_lowercase() -> TestResult {
        assert_eq!(serde_json::to_string(&PaymentMethod::Cash)?, "\"cash\"");
        assert_eq!(serde_json::to_string(&PaymentMethod::Qris)?, "\"qris\"");

        Ok(())
    }

    #[test]
    fn line_snapshot_uses_wire_field_names() -> TestResult {
        let snapshot = LineSnapshot {
            product_id: "P1".to_string(),
            name: "Indomie".to_string(),
            quantity: 2,
            unit_price: 3_500,
            line_total: 7_000,
            category: "makanan".to_string(),
        };

        let value = serde_json::to_value(&snapshot)?;

        assert_eq!(value["price"], 3_500);
        assert_eq!(value["total"], 7_000);

        Ok(())
    }

    #[test]
    fn persisted_transaction_round_trips() -> TestResult {
        let json = serde_json::json!({
            "id": "42",
            "transaction_code": "TRX260827001",
            "items": [{
                "product_id": "P1",
                "name": "Indomie",
                "quantity": 2,
                "price": 3_500,
                "total": 7_000,
                "category": "makanan",
            }],
            "subtotal": 7_000,
            "discount": 0,
            "total": 7_000,
            "payment_method": "cash",
            "cash_received": 10_000,
            "change": 3_000,
            "status": "completed",
            "created_at": "2026-08-27T07:30:00Z",
        });

        let record: PersistedTransaction = serde_json::from_value(json)?;

        assert_eq!(record.transaction_code, "TRX260827001");
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.status, TransactionStatus::Completed);

        Ok(())
    }
}
