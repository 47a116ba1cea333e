//! # Finance Store
//!
//! Client-side state for the finance tracker: the income and expense
//! collections, the last error message, and the derived totals the dashboard
//! displays.
//!
//! ## Data Flow:
//! 1. A caller invokes a mutation (`add_income`, `delete_expense`, ...)
//! 2. The store sends the request through [`ApiClient`]
//! 3. On success the store explicitly re-fetches the affected collection
//! 4. On failure the error text is recorded in `error` and returned
//!
//! Collections are never merged locally. Every successful fetch replaces the
//! whole collection with what the backend returned.

use serde_json::Value;
use shared::{NewTransaction, Transaction, TransactionKind};
use tracing::{debug, error, warn};

use crate::error::ApiError;
use crate::services::api::ApiClient;
use crate::store::aggregates::{self, HistoryEntry, RECENT_HISTORY_LEN};

pub struct FinanceStore {
    api: ApiClient,
    incomes: Vec<Transaction>,
    expenses: Vec<Transaction>,
    error: Option<String>,
}

impl FinanceStore {
    /// Create an empty store backed by the given client
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            incomes: Vec::new(),
            expenses: Vec::new(),
            error: None,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn incomes(&self) -> &[Transaction] {
        &self.incomes
    }

    pub fn expenses(&self) -> &[Transaction] {
        &self.expenses
    }

    pub fn transactions(&self, kind: TransactionKind) -> &[Transaction] {
        match kind {
            TransactionKind::Income => &self.incomes,
            TransactionKind::Expense => &self.expenses,
        }
    }

    /// Message from the most recent failed operation, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // ---- incomes ----

    pub async fn add_income(&mut self, item: &NewTransaction) -> Result<(), ApiError> {
        self.add(TransactionKind::Income, item).await
    }

    pub async fn get_incomes(&mut self) -> Result<(), ApiError> {
        self.fetch(TransactionKind::Income).await
    }

    pub async fn delete_income(&mut self, id: &str) -> Result<(), ApiError> {
        self.delete(TransactionKind::Income, id).await
    }

    pub fn total_income(&self) -> f64 {
        aggregates::sum_amounts(&self.incomes)
    }

    // ---- expenses ----

    pub async fn add_expense(&mut self, item: &NewTransaction) -> Result<(), ApiError> {
        self.add(TransactionKind::Expense, item).await
    }

    pub async fn get_expenses(&mut self) -> Result<(), ApiError> {
        self.fetch(TransactionKind::Expense).await
    }

    pub async fn delete_expense(&mut self, id: &str) -> Result<(), ApiError> {
        self.delete(TransactionKind::Expense, id).await
    }

    pub fn total_expenses(&self) -> f64 {
        aggregates::sum_amounts(&self.expenses)
    }

    // ---- derived ----

    pub fn total_balance(&self) -> f64 {
        self.total_income() - self.total_expenses()
    }

    /// The three newest transactions across both collections
    pub fn recent_history(&self) -> Vec<HistoryEntry<'_>> {
        self.history(RECENT_HISTORY_LEN)
    }

    pub fn history(&self, limit: usize) -> Vec<HistoryEntry<'_>> {
        aggregates::merge_history(&self.incomes, &self.expenses, limit)
    }

    // ---- generic operations ----

    /// Send a new transaction, then refresh that collection.
    ///
    /// Nothing is inserted locally; the item only shows up once the
    /// follow-up fetch returns it.
    pub async fn add(&mut self, kind: TransactionKind, item: &NewTransaction) -> Result<(), ApiError> {
        let result = self.api.add_transaction(kind, item).await;
        self.record(kind, "add", result)?;
        self.fetch(kind).await
    }

    /// Replace a collection with the backend's current contents.
    ///
    /// A payload that is not an array empties the collection without
    /// recording an error.
    pub async fn fetch(&mut self, kind: TransactionKind) -> Result<(), ApiError> {
        let result = self.api.list_transactions(kind).await;
        let payload = self.record(kind, "fetch", result)?;

        match payload {
            Value::Array(items) => {
                let decoded = serde_json::from_value::<Vec<Transaction>>(Value::Array(items))
                    .map_err(ApiError::from);
                let transactions = self.record(kind, "fetch", decoded)?;
                debug!(%kind, count = transactions.len(), "Fetched transactions");
                *self.collection_mut(kind) = transactions;
            }
            other => {
                warn!(%kind, payload = json_type(&other), "Expected an array of transactions");
                self.collection_mut(kind).clear();
            }
        }

        Ok(())
    }

    /// Delete by id, then refresh that collection
    pub async fn delete(&mut self, kind: TransactionKind, id: &str) -> Result<(), ApiError> {
        let result = self.api.delete_transaction(kind, id).await;
        self.record(kind, "delete", result)?;
        self.fetch(kind).await
    }

    /// Fetch both collections. Both requests are attempted; when both fail
    /// the expense error is returned, the same one `error()` then holds.
    pub async fn refresh_all(&mut self) -> Result<(), ApiError> {
        let incomes = self.fetch(TransactionKind::Income).await;
        let expenses = self.fetch(TransactionKind::Expense).await;
        expenses.and(incomes)
    }

    fn collection_mut(&mut self, kind: TransactionKind) -> &mut Vec<Transaction> {
        match kind {
            TransactionKind::Income => &mut self.incomes,
            TransactionKind::Expense => &mut self.expenses,
        }
    }

    /// Overwrite `error` with the failure text, passing the result through
    fn record<T>(
        &mut self,
        kind: TransactionKind,
        operation: &str,
        result: Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        if let Err(e) = &result {
            error!(%kind, operation, "Request failed: {}", e);
            self.error = Some(e.to_string());
        }
        result
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
