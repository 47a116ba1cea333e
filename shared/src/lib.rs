use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// A single income or expense record as returned by the backend.
///
/// Only `id`, `amount` and `createdAt` are interpreted by the client. Every
/// other field (title, category, description, ...) is carried untouched in
/// `details` so it survives a round trip through the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTransaction")]
pub struct Transaction {
    /// Backend identifier. Document stores report it as `_id`, sometimes
    /// alongside a virtual `id`.
    pub id: String,
    /// Transaction amount, not validated locally
    pub amount: f64,
    /// Creation timestamp assigned by the backend
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Fields this layer does not interpret
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Wire shape accepting `id`, `_id` or both
#[derive(Deserialize)]
struct RawTransaction {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    document_id: Option<String>,
    amount: f64,
    #[serde(rename = "createdAt")]
    created_at: DateTime<Utc>,
    #[serde(flatten)]
    details: Map<String, Value>,
}

impl TryFrom<RawTransaction> for Transaction {
    type Error = String;

    fn try_from(raw: RawTransaction) -> Result<Self, Self::Error> {
        let id = raw
            .id
            .or(raw.document_id)
            .ok_or_else(|| "missing field `id` or `_id`".to_string())?;

        Ok(Self {
            id,
            amount: raw.amount,
            created_at: raw.created_at,
            details: raw.details,
        })
    }
}

impl Transaction {
    /// Look up one of the opaque fields, e.g. `title`
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }
}

/// Body sent when creating a transaction. The backend assigns `id` and
/// `createdAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub amount: f64,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl NewTransaction {
    pub fn new(amount: f64) -> Self {
        Self {
            amount,
            details: Map::new(),
        }
    }

    /// Attach an extra field to the request body
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// Which of the two collections a transaction belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 2] = [TransactionKind::Income, TransactionKind::Expense];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Relative path for POST requests
    pub fn add_path(&self) -> &'static str {
        match self {
            TransactionKind::Income => "add-income",
            TransactionKind::Expense => "add-expense",
        }
    }

    /// Relative path for listing the whole collection
    pub fn list_path(&self) -> &'static str {
        match self {
            TransactionKind::Income => "get-incomes",
            TransactionKind::Expense => "get-expenses",
        }
    }

    /// Relative path prefix for deletes; the id is appended as its own segment
    pub fn delete_path(&self) -> &'static str {
        match self {
            TransactionKind::Income => "delete-income",
            TransactionKind::Expense => "delete-expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" | "incomes" => Ok(TransactionKind::Income),
            "expense" | "expenses" => Ok(TransactionKind::Expense),
            other => Err(format!("Unknown transaction kind: {}", other)),
        }
    }
}

/// Error payload returned by the backend on failed requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}
