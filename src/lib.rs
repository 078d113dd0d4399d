//! Tillpoint
//!
//! Tillpoint is the session-side core of a small retail point of sale: cart
//! management under stock constraints, transaction finalization and
//! submission, draft save/restore, and read-side statistics over catalog,
//! transaction, and stock-log collections.
//!
//! The crate owns no UI and no backend. Rendering layers call the pure
//! operations on [`session::Session`] and re-render from their return values;
//! durability and submission happen through the [`store::SessionStore`] and
//! [`backend::TransactionBackend`] traits.

pub mod backend;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod fixtures;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod reports;
pub mod session;
pub mod stock;
pub mod store;
pub mod transactions;
