//! Pricing
//!
//! Derived totals over a cart. Summaries are pure functions of current cart
//! state and are recomputed on every call; nothing here is cached.

use serde::Serialize;

use crate::cart::{Cart, CartLine};

/// Cart totals in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Sum of all line totals.
    pub subtotal: u64,

    /// Always zero for now; reserved extension point.
    pub discount: u64,

    /// `subtotal - discount`.
    pub total: u64,
}

/// Change due against a total, for cash payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Change {
    /// `max(cash_received - total, 0)`, the amount handed back.
    pub due: u64,

    /// `cash_received - total`; negative when the payment is short.
    pub balance: i128,
}

impl Change {
    /// Whether the cash received covers the total.
    #[must_use]
    pub fn is_sufficient(&self) -> bool {
        self.balance >= 0
    }
}

/// Compute the cart summary: subtotal, discount (currently always zero), and
/// total.
#[must_use]
pub fn summarize(cart: &Cart) -> Summary {
    let subtotal = cart.lines().iter().map(CartLine::line_total).sum();
    let discount = 0;

    Summary {
        subtotal,
        discount,
        total: subtotal - discount,
    }
}

/// Compute change for a cash payment against a total.
#[must_use]
pub fn change_for(total: u64, cash_received: u64) -> Change {
    let balance = i128::from(cash_received) - i128::from(total);

    Change {
        due: cash_received.saturating_sub(total),
        balance,
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use crate::products::Product;

    use super::*;

    fn product(id: &str, selling_price: u64) -> Product {
        Product {
            id: id.to_string(),
            code: format!("PRD-{id}"),
            name: format!("Product {id}"),
            category: "makanan".to_string(),
            unit: "pcs".to_string(),
            purchase_price: selling_price / 2,
            selling_price,
            stock: 10,
            min_stock: 2,
            barcode: None,
            description: None,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn summarize_empty_cart_is_zero() {
        let summary = summarize(&Cart::new());

        assert_eq!(summary.subtotal, 0);
        assert_eq!(summary.discount, 0);
        assert_eq!(summary.total, 0);
    }

    #[test]
    fn summarize_sums_line_totals_after_every_mutation() -> TestResult {
        let mut cart = Cart::new();

        let a = cart.add_item(&product("P1", 10_000), 2)?;
        cart.add_item(&product("P2", 2_500), 1)?;

        assert_eq!(summarize(&cart).total, 22_500);

        cart.set_quantity(a, 5)?;

        assert_eq!(summarize(&cart).total, 52_500);

        cart.remove_line(a);

        assert_eq!(summarize(&cart).total, 2_500);

        Ok(())
    }

    #[test]
    fn change_clamps_display_and_keeps_signed_balance() {
        let short = change_for(50_000, 40_000);

        assert_eq!(short.due, 0);
        assert_eq!(short.balance, -10_000);
        assert!(!short.is_sufficient());

        let exact = change_for(50_000, 50_000);

        assert_eq!(exact.due, 0);
        assert!(exact.is_sufficient());

        let over = change_for(50_000, 60_000);

        assert_eq!(over.due, 10_000);
        assert_eq!(over.balance, 10_000);
    }
}
