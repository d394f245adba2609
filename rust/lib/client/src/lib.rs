//! Typed HTTP client for remote entity collections.
//!
//! Every endpoint answers with a `{success, data, error}` envelope. The
//! client unwraps it for single-record calls and hands the normalized
//! envelope back from `list()`, where failures never escape as errors.
//!
//! # Usage
//!
//! ```ignore
//! use llama_client::ResourceClient;
//!
//! let client = ResourceClient::<Llama>::new("http://localhost:8080");
//! let listed = client.list().await;
//! if listed.success {
//!     println!("{} records", listed.data.unwrap_or_default().len());
//! }
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

// ── Error ───────────────────────────────────────────────────────────

/// Client-side API error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),

    /// The backend answered 2xx but flagged the envelope as unsuccessful.
    #[error("rejected: {0}")]
    Rejected(String),
}

// ── Envelope ────────────────────────────────────────────────────────

/// Uniform response shape shared by every entity endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(reason.into()),
        }
    }

    /// Unwrap a successful envelope into its payload.
    pub fn into_result(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected(
                self.error.unwrap_or_else(|| "unspecified failure".into()),
            ));
        }
        self.data
            .ok_or_else(|| ApiError::Decode("envelope has no data".into()))
    }
}

// ── Resource ────────────────────────────────────────────────────────

/// A record type stored in a remote collection.
///
/// Records are addressed at `{base_url}/entities/{collection}/{id}`.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// JSON field carrying the backend-assigned identifier.
    const ID_FIELD: &'static str = "_id";

    /// Collection segment in the URL, e.g. `llamas`.
    fn collection() -> &'static str;

    /// Identifier, once the backend has assigned one.
    fn id(&self) -> Option<&str>;
}

// ── EntityGateway ───────────────────────────────────────────────────

/// The operations a catalog needs from its backend.
///
/// No delete: the backend does not offer one.
#[async_trait::async_trait]
pub trait EntityGateway<T: Resource>: Send + Sync {
    /// Fetch the full collection. Failures come back as `success = false`.
    async fn list(&self) -> Envelope<Vec<T>>;

    /// Create a record; the backend assigns its identifier.
    async fn create(&self, item: &T) -> Result<T, ApiError>;

    /// Replace the record at `id` with the full payload.
    async fn update(&self, id: &str, item: &T) -> Result<T, ApiError>;
}

#[async_trait::async_trait]
impl<T: Resource, G: EntityGateway<T> + ?Sized> EntityGateway<T> for Arc<G> {
    async fn list(&self) -> Envelope<Vec<T>> {
        (**self).list().await
    }

    async fn create(&self, item: &T) -> Result<T, ApiError> {
        (**self).create(item).await
    }

    async fn update(&self, id: &str, item: &T) -> Result<T, ApiError> {
        (**self).update(id, item).await
    }
}

// ── ResourceClient ──────────────────────────────────────────────────

/// Type-safe client for a single remote collection.
pub struct ResourceClient<T: Resource> {
    http: reqwest::Client,
    base_url: String,
    _phantom: PhantomData<T>,
}

impl<T: Resource> ResourceClient<T> {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    /// Build on a preconfigured `reqwest::Client` (proxies, headers).
    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            _phantom: PhantomData,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Collection URL: `{base}/entities/{collection}`.
    fn collection_url(&self) -> String {
        format!("{}/entities/{}", self.base_url, T::collection())
    }

    /// URL for a single record: `{base}/entities/{collection}/{id}`.
    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    /// Parse an envelope response, mapping HTTP errors to `ApiError`.
    async fn parse<R: DeserializeOwned>(resp: reqwest::Response) -> Result<R, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            let code = status.as_u16();
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|env| env.error)
                .unwrap_or(body);
            return Err(ApiError::Server { status: code, message });
        }
        let envelope: Envelope<R> = resp
            .json()
            .await
            .map_err(|e| ApiError::Decode(format!("response body: {}", e)))?;
        envelope.into_result()
    }

    /// Serialize a record for creation, dropping any identifier.
    fn creation_body(item: &T) -> Result<serde_json::Value, ApiError> {
        let mut body = serde_json::to_value(item)
            .map_err(|e| ApiError::Decode(format!("request body: {}", e)))?;
        if let Some(map) = body.as_object_mut() {
            map.remove(T::ID_FIELD);
        }
        Ok(body)
    }

    async fn fetch_all(&self) -> Result<Vec<T>, ApiError> {
        let resp = self.http.get(self.collection_url()).send().await?;
        let raw: Vec<serde_json::Value> = Self::parse(resp).await?;
        Ok(Self::decode_records(raw))
    }

    /// Decode each record on its own; records that don't fit `T` are skipped.
    fn decode_records(raw: Vec<serde_json::Value>) -> Vec<T> {
        raw.into_iter()
            .enumerate()
            .filter_map(|(index, value)| {
                let id = value
                    .get(T::ID_FIELD)
                    .and_then(|v| v.as_str())
                    .unwrap_or("-")
                    .to_string();
                serde_json::from_value(value)
                    .inspect_err(|e| {
                        warn!(collection = T::collection(), index, id = %id, error = %e, "skipping undecodable record")
                    })
                    .ok()
            })
            .collect()
    }

    /// List all records, normalized into an envelope.
    pub async fn list(&self) -> Envelope<Vec<T>> {
        match self.fetch_all().await {
            Ok(items) => {
                debug!(collection = T::collection(), count = items.len(), "listed");
                Envelope::ok(items)
            }
            Err(e) => {
                warn!(collection = T::collection(), error = %e, "list failed");
                Envelope::failure(e.to_string())
            }
        }
    }

    /// Get a record by ID.
    pub async fn get(&self, id: &str) -> Result<T, ApiError> {
        let resp = self.http.get(self.item_url(id)).send().await?;
        Self::parse(resp).await
    }

    /// Create a new record. Any identifier on `item` is not sent.
    pub async fn create(&self, item: &T) -> Result<T, ApiError> {
        let body = Self::creation_body(item)?;
        let resp = self.http.post(self.collection_url()).json(&body).send().await?;
        Self::parse(resp).await
    }

    /// Replace an existing record by ID.
    pub async fn update(&self, id: &str, item: &T) -> Result<T, ApiError> {
        let resp = self.http.put(self.item_url(id)).json(item).send().await?;
        Self::parse(resp).await
    }
}

#[async_trait::async_trait]
impl<T: Resource> EntityGateway<T> for ResourceClient<T> {
    async fn list(&self) -> Envelope<Vec<T>> {
        ResourceClient::list(self).await
    }

    async fn create(&self, item: &T) -> Result<T, ApiError> {
        ResourceClient::create(self, item).await
    }

    async fn update(&self, id: &str, item: &T) -> Result<T, ApiError> {
        ResourceClient::update(self, id, item).await
    }
}
