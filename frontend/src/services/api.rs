use reqwest::{Client, Response, Url};
use serde_json::Value;
use shared::{ApiErrorBody, NewTransaction, TransactionKind};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::ApiError;

/// API client for communicating with the finance backend.
///
/// Each method issues exactly one request. Keeping local state in sync is the
/// store's job, not the client's.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client from loaded configuration
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// Create a new API client with a custom base URL and default settings
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        let config = Config::new(base_url).map_err(|e| ApiError::Url(e.to_string()))?;
        Self::new(&config)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a relative endpoint path against the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Url(format!("{}: {}", path, e)))
    }

    /// URL for deleting one transaction; the id becomes a single encoded segment
    pub fn delete_url(&self, kind: TransactionKind, id: &str) -> Result<Url, ApiError> {
        let mut url = self.endpoint(kind.delete_path())?;
        let base = url.to_string();
        url.path_segments_mut()
            .map_err(|_| ApiError::Url(format!("{} cannot take path segments", base)))?
            .push(id);
        Ok(url)
    }

    /// POST a new transaction. The response body is ignored.
    pub async fn add_transaction(
        &self,
        kind: TransactionKind,
        item: &NewTransaction,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(kind.add_path())?;
        info!(%url, %kind, amount = item.amount, "POST new transaction");

        let response = self.http.post(url).json(item).send().await?;
        check_status(response).await?;
        Ok(())
    }

    /// GET the whole collection as raw JSON.
    ///
    /// An empty body is reported as `Value::Null` and a body that is not JSON
    /// (an HTML error page, plain text) as `Value::String`, so the caller
    /// treats both like any other non-array payload.
    pub async fn list_transactions(&self, kind: TransactionKind) -> Result<Value, ApiError> {
        let url = self.endpoint(kind.list_path())?;
        info!(%url, %kind, "GET transactions");

        let response = self.http.get(url).send().await?;
        let response = check_status(response).await?;
        let body = response.bytes().await?;

        if body.is_empty() {
            debug!(%kind, "Empty list response body");
            return Ok(Value::Null);
        }

        match serde_json::from_slice(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(%kind, "List response is not JSON: {}", e);
                Ok(Value::String(String::from_utf8_lossy(&body).into_owned()))
            }
        }
    }

    /// DELETE a transaction by id
    pub async fn delete_transaction(&self, kind: TransactionKind, id: &str) -> Result<(), ApiError> {
        let url = self.delete_url(kind, id)?;
        info!(%url, %kind, id, "DELETE transaction");

        let response = self.http.delete(url).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Turn non-success responses into `ApiError::Server`, pulling the backend's
/// `message` field out of the body when there is one.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await.unwrap_or_default();
    let message = serde_json::from_slice::<ApiErrorBody>(&body)
        .ok()
        .and_then(|b| b.message);

    let err = ApiError::server(status, message);
    error!(status = status.as_u16(), "Request failed: {}", err);
    Err(err)
}
