//! Session
//!
//! The state manager a point-of-sale page drives. A [`Session`] owns the
//! live [`Cart`] and a [`SessionStore`]; every mutation writes the cart back
//! to the store before returning, so a reload (or a second session over the
//! same store) picks up exactly where the last mutation left off.
//!
//! Payment is the only multi-step operation: finalize the cart, submit it to
//! the backend, and clear the cart only once the backend has committed.
//! Any failure along the way leaves the cart untouched and the whole
//! operation re-invocable.

use jiff::{Timestamp, Zoned};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    backend::{BackendError, TransactionBackend},
    cart::{Cart, CartError},
    checkout::{self, CheckoutError},
    pricing::{self, Change, Summary},
    products::Product,
    store::{CART_KEY, DRAFT_KEY, SessionStore, StoreError, get_value, put_value},
    transactions::{PaymentMethod, PersistedTransaction},
};

/// Errors from session operations. None of them leave the live cart in a
/// partially-applied state.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A cart mutation was rejected.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The cart could not be finalized for payment.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// The session store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The transaction backend failed or refused.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// `restore_draft` was called with no draft saved.
    #[error("no saved draft")]
    NoDraft,
}

/// A parked cart, saved to be resumed later. Never expires on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftTransaction {
    /// The cart as it stood when saved.
    pub items: Cart,

    /// When the draft was saved.
    pub saved_at: Timestamp,
}

/// A point-of-sale session: the live cart plus its backing store.
#[derive(Debug)]
pub struct Session<S> {
    store: S,
    cart: Cart,
}

impl<S: SessionStore> Session<S> {
    /// Start a session over `store`, restoring any previously persisted
    /// cart. A missing or never-written cart key starts the session empty.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if the store fails or holds a value that
    /// is not a cart.
    pub async fn restore(store: S) -> Result<Self, SessionError> {
        let cart: Cart = get_value(&store, CART_KEY).await?.unwrap_or_default();

        debug!(lines = cart.len(), "session restored");

        Ok(Self { store, cart })
    }

    /// The live cart.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Subtotal, discount and total for the live cart.
    #[must_use]
    pub fn summary(&self) -> Summary {
        pricing::summarize(&self.cart)
    }

    /// Change due for a proposed cash amount against the current total.
    #[must_use]
    pub fn change_for(&self, cash_received: u64) -> Change {
        pricing::change_for(self.summary().total, cash_received)
    }

    async fn persist_cart(&self) -> Result<(), StoreError> {
        put_value(&self.store, CART_KEY, &self.cart).await
    }

    /// Add `requested` units of a product and persist the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if the cart rejects the add or the store
    /// write fails. A rejected add writes nothing.
    pub async fn add_item(&mut self, product: &Product, requested: u32) -> Result<Uuid, SessionError> {
        let line_id = self.cart.add_item(product, requested)?;

        self.persist_cart().await?;

        debug!(product = %product.id, quantity = requested, "added to cart");

        Ok(line_id)
    }

    /// Set a line's quantity and persist the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if the quantity is out of range or the
    /// store write fails.
    pub async fn set_quantity(&mut self, line_id: Uuid, quantity: u32) -> Result<(), SessionError> {
        self.cart.set_quantity(line_id, quantity)?;
        self.persist_cart().await?;

        Ok(())
    }

    /// Increase a line's quantity by one and persist the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if the line is already at its stock
    /// ceiling or the store write fails.
    pub async fn increment(&mut self, line_id: Uuid) -> Result<(), SessionError> {
        self.cart.increment(line_id)?;
        self.persist_cart().await?;

        Ok(())
    }

    /// Decrease a line's quantity by one (never below one) and persist the
    /// cart.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if the store write fails.
    pub async fn decrement(&mut self, line_id: Uuid) -> Result<(), SessionError> {
        self.cart.decrement(line_id);
        self.persist_cart().await?;

        Ok(())
    }

    /// Remove a line and persist the cart. No-op for a missing line.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if the store write fails.
    pub async fn remove_line(&mut self, line_id: Uuid) -> Result<(), SessionError> {
        self.cart.remove_line(line_id);
        self.persist_cart().await?;

        Ok(())
    }

    /// Empty the cart and persist it.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if the store write fails.
    pub async fn clear(&mut self) -> Result<(), SessionError> {
        self.cart.clear();
        self.persist_cart().await?;

        Ok(())
    }

    /// Park the live cart as a draft under its own key. The live cart is
    /// left as it is; parking is a snapshot, not a hand-off.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if the cart is empty or the store write
    /// fails.
    pub async fn save_draft(&self, now: &Zoned) -> Result<(), SessionError> {
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart.into());
        }

        let draft = DraftTransaction {
            items: self.cart.clone(),
            saved_at: now.timestamp(),
        };

        put_value(&self.store, DRAFT_KEY, &draft).await?;

        debug!(lines = draft.items.len(), "draft saved");

        Ok(())
    }

    /// Replace the live cart with the saved draft, persist it, and remove
    /// the draft. Returns when the draft was saved.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NoDraft`] if no draft is saved.
    /// - [`SessionError::Store`] if the store fails.
    pub async fn restore_draft(&mut self) -> Result<Timestamp, SessionError> {
        let draft: DraftTransaction = get_value(&self.store, DRAFT_KEY)
            .await?
            .ok_or(SessionError::NoDraft)?;

        self.cart = draft.items;
        self.persist_cart().await?;
        self.store.delete(DRAFT_KEY).await?;

        debug!(lines = self.cart.len(), "draft restored");

        Ok(draft.saved_at)
    }

    /// Take payment for the live cart.
    ///
    /// Finalizes the cart, submits it to `backend`, and clears the cart
    /// only after the backend returns the persisted record. `now` is the
    /// session clock used for the transaction code.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if finalizing fails, the backend does not
    /// commit, or the post-commit store write fails. In every error case
    /// the cart still holds its lines and `pay` may be called again.
    pub async fn pay<B>(
        &mut self,
        backend: &B,
        method: PaymentMethod,
        cash_received: u64,
        now: &Zoned,
    ) -> Result<PersistedTransaction, SessionError>
    where
        B: TransactionBackend + ?Sized,
    {
        let finalized = checkout::finalize(&self.cart, method, cash_received, now)?;
        let persisted = backend.submit_transaction(&finalized).await?;

        self.cart.clear();
        self.persist_cart().await?;

        info!(
            code = %persisted.transaction_code,
            total = persisted.total,
            method = ?method,
            "transaction committed"
        );

        Ok(persisted)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use jiff::Timestamp;
    use testresult::TestResult;

    use crate::{
        backend::MockTransactionBackend,
        store::MemoryStore,
        transactions::TransactionStatus,
    };

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

    fn clock() -> Result<Zoned, jiff::Error> {
        "2026-08-27T14:30:00+07:00[Asia/Jakarta]".parse()
    }

    #[tokio::test]
    async fn restore_starts_empty_on_fresh_store() -> TestResult {
        let session = Session::restore(MemoryStore::new()).await?;

        assert!(session.cart().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn mutations_persist_across_sessions() -> TestResult {
        let store = Arc::new(MemoryStore::new());

        let mut session = Session::restore(Arc::clone(&store)).await?;
        let line_id = session.add_item(&product("P1", 5, 10_000), 2).await?;

        session.increment(line_id).await?;

        let resumed = Session::restore(store).await?;
        let line = resumed.cart().line(line_id).ok_or("line missing after resume")?;

        assert_eq!(line.quantity(), 3);
        assert_eq!(resumed.summary().total, 30_000);

        Ok(())
    }

    #[tokio::test]
    async fn rejected_mutation_writes_nothing() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let mut session = Session::restore(Arc::clone(&store)).await?;

        let result = session.add_item(&product("P1", 0, 10_000), 1).await;

        assert!(matches!(result, Err(SessionError::Cart(_))), "got {result:?}");
        assert_eq!(store.get(CART_KEY).await?, None, "rejected add must not persist");

        Ok(())
    }

    #[tokio::test]
    async fn draft_round_trip_replaces_live_cart() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let mut session = Session::restore(Arc::clone(&store)).await?;

        session.add_item(&product("P1", 5, 10_000), 2).await?;
        session.save_draft(&clock()?).await?;

        session.clear().await?;
        session.add_item(&product("P2", 9, 2_000), 1).await?;

        let saved_at = session.restore_draft().await?;

        assert_eq!(saved_at, clock()?.timestamp());
        assert_eq!(session.cart().len(), 1);
        assert_eq!(session.summary().total, 20_000, "draft cart replaces the live one");
        assert_eq!(store.get(DRAFT_KEY).await?, None, "draft is consumed on restore");

        let result = session.restore_draft().await;

        assert!(matches!(result, Err(SessionError::NoDraft)), "got {result:?}");

        Ok(())
    }

    #[tokio::test]
    async fn save_draft_rejects_empty_cart() -> TestResult {
        let session = Session::restore(MemoryStore::new()).await?;

        let result = session.save_draft(&clock()?).await;

        assert!(
            matches!(result, Err(SessionError::Checkout(CheckoutError::EmptyCart))),
            "got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn pay_clears_cart_only_after_commit() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let mut session = Session::restore(Arc::clone(&store)).await?;

        session.add_item(&product("P1", 5, 10_000), 2).await?;

        let mut backend = MockTransactionBackend::new();

        backend.expect_submit_transaction().returning(|tx| {
            Ok(PersistedTransaction {
                id: "1".to_string(),
                transaction_code: tx.transaction_code().to_string(),
                items: tx.items().to_vec(),
                subtotal: tx.subtotal(),
                discount: tx.discount(),
                total: tx.total(),
                payment_method: tx.payment_method(),
                cash_received: tx.cash_received(),
                change: tx.change(),
                status: TransactionStatus::Completed,
                created_at: Timestamp::UNIX_EPOCH,
            })
        });

        let persisted = session.pay(&backend, PaymentMethod::Cash, 50_000, &clock()?).await?;

        assert_eq!(persisted.total, 20_000);
        assert_eq!(persisted.change, 30_000);
        assert!(session.cart().is_empty(), "committed payment clears the cart");

        let resumed = Session::restore(store).await?;

        assert!(resumed.cart().is_empty(), "cleared cart is persisted");

        Ok(())
    }

    #[tokio::test]
    async fn pay_failure_leaves_cart_intact() -> TestResult {
        let mut session = Session::restore(MemoryStore::new()).await?;

        session.add_item(&product("P1", 5, 10_000), 2).await?;

        let mut backend = MockTransactionBackend::new();

        backend
            .expect_submit_transaction()
            .returning(|_| Err(BackendError::Rejected("stock changed".to_string())));

        let result = session.pay(&backend, PaymentMethod::Cash, 50_000, &clock()?).await;

        assert!(matches!(result, Err(SessionError::Backend(_))), "got {result:?}");
        assert_eq!(session.cart().len(), 1, "failed submission must not clear the cart");

        Ok(())
    }
}
