//! Receipt
//!
//! Plain-text till receipt for a committed transaction. Amounts are
//! formatted through `rusty-money` from the record's minor units; layout is
//! a borderless `tabled` table so the item columns line up at any name
//! length.

use std::io;

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::transactions::{PaymentMethod, PersistedTransaction};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// Printable receipt for a committed transaction.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    transaction: &'a PersistedTransaction,
    currency: &'static Currency,
}

impl<'a> Receipt<'a> {
    /// Create a receipt rendering `transaction` amounts in `currency`.
    #[must_use]
    pub fn new(transaction: &'a PersistedTransaction, currency: &'static Currency) -> Self {
        Self {
            transaction,
            currency,
        }
    }

    /// The currency used for all monetary values.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Write the receipt.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let tx = self.transaction;
        let when = tx.created_at.strftime("%Y-%m-%d %H:%M");

        writeln!(out, "{}", tx.transaction_code).map_err(|_err| ReceiptError::IO)?;
        writeln!(out, "{when}").map_err(|_err| ReceiptError::IO)?;
        writeln!(out).map_err(|_err| ReceiptError::IO)?;

        let mut builder = Builder::default();

        for item in &tx.items {
            builder.push_record([
                item.name.clone(),
                format!("{}x", item.quantity),
                self.money(item.unit_price).to_string(),
                self.money(item.line_total).to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::blank());
        table.modify(Columns::new(1..), Alignment::right());

        writeln!(out, "{table}").map_err(|_err| ReceiptError::IO)?;
        writeln!(out).map_err(|_err| ReceiptError::IO)?;

        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let tx = self.transaction;

        let mut builder = Builder::default();

        builder.push_record(["Subtotal".to_string(), self.money(tx.subtotal).to_string()]);
        builder.push_record(["Discount".to_string(), self.money(tx.discount).to_string()]);
        builder.push_record(["TOTAL".to_string(), self.money(tx.total).to_string()]);
        builder.push_record([
            "Payment".to_string(),
            method_label(tx.payment_method).to_string(),
        ]);

        if tx.payment_method.is_cash() {
            builder.push_record(["Cash".to_string(), self.money(tx.cash_received).to_string()]);
            builder.push_record(["Change".to_string(), self.money(tx.change).to_string()]);
        }

        let mut table = builder.build();

        table.with(Style::blank());
        table.modify(Columns::last(), Alignment::right());

        writeln!(out, "{table}").map_err(|_err| ReceiptError::IO)
    }

    fn money(&self, amount: u64) -> Money<'static, Currency> {
        // Till amounts are far below i64::MAX minor units; saturate rather
        // than panic if a corrupt record ever gets here.
        Money::from_minor(i64::try_from(amount).unwrap_or(i64::MAX), self.currency)
    }
}

fn method_label(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Cash => "CASH",
        PaymentMethod::Card => "CARD",
        PaymentMethod::Qris => "QRIS",
        PaymentMethod::Transfer => "TRANSFER",
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use crate::transactions::{LineSnapshot, TransactionStatus};

    use super::*;

    fn transaction(method: PaymentMethod) -> Result<PersistedTransaction, jiff::Error> {
        Ok(PersistedTransaction {
            id: "1".to_string(),
            transaction_code: "TRX260827042".to_string(),
            items: vec![
                LineSnapshot {
                    product_id: "P1".to_string(),
                    name: "Indomie Goreng".to_string(),
                    quantity: 2,
                    unit_price: 3_500,
                    line_total: 7_000,
                    category: "makanan".to_string(),
                },
                LineSnapshot {
                    product_id: "P2".to_string(),
                    name: "Teh Botol".to_string(),
                    quantity: 1,
                    unit_price: 5_000,
                    line_total: 5_000,
                    category: "minuman".to_string(),
                },
            ],
            subtotal: 12_000,
            discount: 0,
            total: 12_000,
            payment_method: method,
            cash_received: if method.is_cash() { 20_000 } else { 0 },
            change: if method.is_cash() { 8_000 } else { 0 },
            status: TransactionStatus::Completed,
            created_at: "2026-08-27T07:30:00Z".parse()?,
        })
    }

    fn render(method: PaymentMethod) -> TestResult<String> {
        let tx = transaction(method)?;
        let mut out = Vec::new();

        Receipt::new(&tx, iso::IDR).write_to(&mut out)?;

        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn cash_receipt_has_code_lines_totals_and_change() -> TestResult {
        let text = render(PaymentMethod::Cash)?;

        assert!(text.contains("TRX260827042"), "{text}");
        assert!(text.contains("Indomie Goreng"), "{text}");
        assert!(text.contains("Teh Botol"), "{text}");
        assert!(text.contains("2x"), "{text}");
        assert!(text.contains("TOTAL"), "{text}");
        assert!(text.contains("CASH"), "{text}");
        assert!(text.contains("Change"), "{text}");

        Ok(())
    }

    #[test]
    fn non_cash_receipt_omits_cash_rows() -> TestResult {
        let text = render(PaymentMethod::Qris)?;

        assert!(text.contains("QRIS"), "{text}");
        assert!(!text.contains("Change"), "{text}");

        Ok(())
    }
}
