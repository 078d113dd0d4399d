//! Walks a full till session against a stub backend: restore a session,
//! ring up a few fixture products, take cash payment, print the receipt.
//!
//! ```sh
//! cargo run --example checkout
//! POS_STORE_PATH=/tmp/till.json cargo run --example checkout
//! ```

use std::{
    io::{self, Write},
    sync::Arc,
};

use async_trait::async_trait;
use jiff::{Timestamp, Zoned};
use rusty_money::iso;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use tillpoint::{
    backend::{BackendError, TransactionBackend},
    config::SessionConfig,
    fixtures::Fixture,
    products::Product,
    receipt::Receipt,
    session::Session,
    stock::StockLog,
    store::{JsonFileStore, MemoryStore, SessionStore},
    transactions::{FinalizedTransaction, PaymentMethod, PersistedTransaction, TransactionStatus},
};

/// Accepts every submission, like a healthy backend on a quiet day.
struct StubBackend;

#[async_trait]
impl TransactionBackend for StubBackend {
    async fn submit_transaction(
        &self,
        transaction: &FinalizedTransaction,
    ) -> Result<PersistedTransaction, BackendError> {
        Ok(PersistedTransaction {
            id: Uuid::now_v7().to_string(),
            transaction_code: transaction.transaction_code().to_string(),
            items: transaction.items().to_vec(),
            subtotal: transaction.subtotal(),
            discount: transaction.discount(),
            total: transaction.total(),
            payment_method: transaction.payment_method(),
            cash_received: transaction.cash_received(),
            change: transaction.change(),
            status: TransactionStatus::Completed,
            created_at: Timestamp::now(),
        })
    }

    async fn list_products(&self) -> Result<Vec<Product>, BackendError> {
        Ok(Vec::new())
    }

    async fn list_transactions(&self) -> Result<Vec<PersistedTransaction>, BackendError> {
        Ok(Vec::new())
    }

    async fn list_stock_logs(&self) -> Result<Vec<StockLog>, BackendError> {
        Ok(Vec::new())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = SessionConfig::load()?;
    let now = Zoned::now().with_time_zone(config.resolve_time_zone()?);

    let mut fixture = Fixture::new();

    fixture.load_products("warung")?;

    let store: Arc<dyn SessionStore> = match &config.store_path {
        Some(path) => Arc::new(JsonFileStore::open(path)?),
        None => Arc::new(MemoryStore::new()),
    };

    let mut session = Session::restore(store).await?;
    let mut out = io::stdout();

    session.add_item(fixture.product("indomie")?, 2).await?;
    session.add_item(fixture.product("teh_botol")?, 1).await?;

    let beras = session.add_item(fixture.product("beras_5kg")?, 1).await?;

    session.increment(beras).await?;

    let summary = session.summary();

    writeln!(out, "{} lines, total {}", session.cart().len(), summary.total)?;

    let change = session.change_for(150_000);

    writeln!(out, "cash 150000 -> change due {}", change.due)?;

    let persisted = session
        .pay(&StubBackend, PaymentMethod::Cash, 150_000, &now)
        .await?;

    writeln!(out)?;
    Receipt::new(&persisted, iso::IDR).write_to(&mut out)?;

    Ok(())
}
