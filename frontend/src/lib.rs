//! # Finance Tracker Frontend
//!
//! Client-side state for the personal finance tracker. The [`FinanceStore`]
//! keeps the income and expense collections in sync with the backend and
//! derives totals, balance and recent history from them.
//!
//! The store is an ordinary value: construct it with an [`ApiClient`] and
//! pass it by reference to whatever needs it.

pub mod config;
pub mod error;
pub mod services;
pub mod store;

pub use config::{Config, ConfigError};
pub use error::{ApiError, ErrorKind};
pub use services::api::ApiClient;
pub use store::{FinanceStore, HistoryEntry};

pub use shared::{NewTransaction, Transaction, TransactionKind};
