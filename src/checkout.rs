//! Checkout
//!
//! Converts a cart into an immutable [`FinalizedTransaction`]. Finalizing is
//! a pure read of the cart: it does not mutate cart state and does not
//! contact the backend, so a failed submission can simply be retried by
//! finalizing again.

use jiff::Zoned;
use thiserror::Error;

use crate::{
    cart::Cart,
    pricing,
    transactions::{FinalizedTransaction, LineSnapshot, PaymentMethod, transaction_code},
};

/// Errors from finalizing a cart. Both leave the cart untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// The cart has no lines to finalize.
    #[error("cart is empty")]
    EmptyCart,

    /// A cash payment that does not cover the total.
    #[error("cash received {received} is less than total {total}")]
    InsufficientPayment {
        /// Cash handed over, in minor units.
        received: u64,

        /// Amount due, in minor units.
        total: u64,
    },
}

/// Build a [`FinalizedTransaction`] from the cart.
///
/// For cash payments the change is `cash_received - total`; for other
/// methods both cash received and change are recorded as zero. `now` is the
/// session clock used for the transaction code's date part.
///
/// # Errors
///
/// - [`CheckoutError::EmptyCart`] if the cart has no lines.
/// - [`CheckoutError::InsufficientPayment`] for cash payments where
///   `cash_received < total`.
pub fn finalize(
    cart: &Cart,
    method: PaymentMethod,
    cash_received: u64,
    now: &Zoned,
) -> Result<FinalizedTransaction, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let summary = pricing::summarize(cart);

    if method.is_cash() && cash_received < summary.total {
        return Err(CheckoutError::InsufficientPayment {
            received: cash_received,
            total: summary.total,
        });
    }

    let items = cart
        .lines()
        .iter()
        .map(|line| LineSnapshot {
            product_id: line.product_id().to_string(),
            name: line.name().to_string(),
            quantity: line.quantity(),
            unit_price: line.unit_price(),
            line_total: line.line_total(),
            category: line.category().to_string(),
        })
        .collect();

    let (cash_received, change) = if method.is_cash() {
        (cash_received, cash_received - summary.total)
    } else {
        (0, 0)
    };

    Ok(FinalizedTransaction::new(
        transaction_code(now),
        items,
        summary.subtotal,
        summary.discount,
        summary.total,
        method,
        cash_received,
        change,
    ))
}
