//! In-process mock of the finance backend.
//!
//! Serves the six transaction endpoints under `/api/v1/`, keeps records in
//! memory, logs every request it sees and can be switched into failure modes.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};
use shared::{ApiErrorBody, TransactionKind};

#[derive(Debug, Clone)]
pub enum Failure {
    /// Error status with a JSON `{ "message": ... }` body
    WithMessage(StatusCode, String),
    /// Error status with an empty body
    WithoutBody(StatusCode),
}

#[derive(Debug, Clone)]
enum ListOverride {
    Json(Value),
    /// Successful status with a raw body and the given content type
    Raw(&'static str, String),
}

#[derive(Default)]
struct MockState {
    incomes: Vec<Value>,
    expenses: Vec<Value>,
    requests: Vec<String>,
    failure: Option<Failure>,
    kind_failures: HashMap<TransactionKind, Failure>,
    list_override: Option<ListOverride>,
    created: i64,
}

impl MockState {
    fn collection(&mut self, kind: TransactionKind) -> &mut Vec<Value> {
        match kind {
            TransactionKind::Income => &mut self.incomes,
            TransactionKind::Expense => &mut self.expenses,
        }
    }
}

#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Start serving on an ephemeral port and return the API base URL
    pub async fn spawn(&self) -> String {
        let app = router(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api/v1/", addr)
    }

    /// Insert a record directly, bypassing the HTTP API
    pub fn seed(&self, kind: TransactionKind, id: &str, amount: f64, created_at: DateTime<Utc>) {
        self.lock().collection(kind).push(json!({
            "_id": id,
            "amount": amount,
            "createdAt": created_at.to_rfc3339(),
            "title": format!("{} {}", kind, id),
        }));
    }

    pub fn remove_directly(&self, kind: TransactionKind, id: &str) {
        self.lock().collection(kind).retain(|v| v["_id"] != id);
    }

    pub fn fail_with(&self, failure: Failure) {
        self.lock().failure = Some(failure);
    }

    /// Fail only the requests touching one collection
    pub fn fail_kind_with(&self, kind: TransactionKind, failure: Failure) {
        self.lock().kind_failures.insert(kind, failure);
    }

    pub fn recover(&self) {
        let mut state = self.lock();
        state.failure = None;
        state.kind_failures.clear();
        state.list_override = None;
    }

    /// Answer every list request with this payload instead of the collection
    pub fn respond_to_list_with(&self, payload: Value) {
        self.lock().list_override = Some(ListOverride::Json(payload));
    }

    /// Answer every list request with a 200 HTML page
    pub fn respond_to_list_with_html(&self, body: &str) {
        self.lock().list_override = Some(ListOverride::Raw("text/html", body.to_string()));
    }

    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    pub fn stored(&self, kind: TransactionKind) -> Vec<Value> {
        self.lock().collection(kind).clone()
    }

    /// Log the request and return the canned failure response, if any
    fn enter(&self, kind: TransactionKind, request: String) -> Option<Response> {
        let mut state = self.lock();
        state.requests.push(request);
        let failure = state
            .failure
            .clone()
            .or_else(|| state.kind_failures.get(&kind).cloned());
        failure.map(|failure| match failure {
            Failure::WithMessage(status, message) => {
                (status, Json(ApiErrorBody::new(message))).into_response()
            }
            Failure::WithoutBody(status) => status.into_response(),
        })
    }

    fn add(&self, kind: TransactionKind, body: Value) -> Response {
        if let Some(response) = self.enter(kind, format!("POST {}", kind.add_path())) {
            return response;
        }

        let Value::Object(mut record) = body else {
            return (StatusCode::BAD_REQUEST, Json(ApiErrorBody::new("Invalid body"))).into_response();
        };
        if !record.get("amount").map(Value::is_number).unwrap_or(false) {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiErrorBody::new("Amount must be a positive number!")),
            )
                .into_response();
        }

        let mut state = self.lock();
        state.created += 1;
        let created_at = base_time() + Duration::minutes(state.created);
        record.insert("_id".into(), json!(uuid::Uuid::new_v4().to_string()));
        record.insert("createdAt".into(), json!(created_at.to_rfc3339()));
        state.collection(kind).push(Value::Object(record));

        (StatusCode::OK, Json(json!({ "message": format!("{} added", kind) }))).into_response()
    }

    fn list(&self, kind: TransactionKind) -> Response {
        if let Some(response) = self.enter(kind, format!("GET {}", kind.list_path())) {
            return response;
        }

        let mut state = self.lock();
        match state.list_override.clone() {
            Some(ListOverride::Json(payload)) => (StatusCode::OK, Json(payload)).into_response(),
            Some(ListOverride::Raw(content_type, body)) => {
                (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response()
            }
            None => (StatusCode::OK, Json(Value::Array(state.collection(kind).clone()))).into_response(),
        }
    }

    fn delete(&self, kind: TransactionKind, id: String) -> Response {
        if let Some(response) = self.enter(kind, format!("DELETE {}/{}", kind.delete_path(), id)) {
            return response;
        }

        let mut state = self.lock();
        let collection = state.collection(kind);
        let before = collection.len();
        collection.retain(|v| v["_id"] != id.as_str());

        if collection.len() == before {
            let message = match kind {
                TransactionKind::Income => "Income not found",
                TransactionKind::Expense => "Expense not found",
            };
            return (StatusCode::NOT_FOUND, Json(ApiErrorBody::new(message))).into_response();
        }
        (StatusCode::OK, Json(json!({ "message": format!("{} deleted", kind) }))).into_response()
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
}

fn router(backend: MockBackend) -> Router {
    let api = Router::new()
        .route("/add-income", post(add_income))
        .route("/get-incomes", get(get_incomes))
        .route("/delete-income/:id", delete(delete_income))
        .route("/add-expense", post(add_expense))
        .route("/get-expenses", get(get_expenses))
        .route("/delete-expense/:id", delete(delete_expense));

    Router::new().nest("/api/v1", api).with_state(backend)
}

async fn add_income(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    backend.add(TransactionKind::Income, body)
}

async fn get_incomes(State(backend): State<MockBackend>) -> Response {
    backend.list(TransactionKind::Income)
}

async fn delete_income(State(backend): State<MockBackend>, Path(id): Path<String>) -> Response {
    backend.delete(TransactionKind::Income, id)
}

async fn add_expense(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    backend.add(TransactionKind::Expense, body)
}

async fn get_expenses(State(backend): State<MockBackend>) -> Response {
    backend.list(TransactionKind::Expense)
}

async fn delete_expense(State(backend): State<MockBackend>, Path(id): Path<String>) -> Response {
    backend.delete(TransactionKind::Expense, id)
}
