//! Bookstore REST API client.
//!
//! # Architecture
//!
//! - [`ApiClient::send`] is the raw transport: it builds the request,
//!   attaches the bearer token when one is present and returns the response
//!   without looking at its status
//! - [`ApiClient::fetch`] checks the status and decodes the body into a typed
//!   schema from `bookshelf-core`; a body that does not match is reported as
//!   [`ApiError::UnexpectedShape`]
//! - Endpoint methods live next to the views that use them
//!   (`catalog`, `account`, `orders`)
//!
//! The token is passed per call rather than stored in the client. The
//! session store owns it and the client never outlives a request with it.
//!
//! # Example
//!
//! ```rust,ignore
//! let api = ApiClient::new(&config)?;
//! let book = api.book(BookId::new(1), session.token()).await?;
//! ```

mod account;
mod catalog;
mod orders;

pub use catalog::{ApiBooks, BookFilters, BookOrdering};
pub use orders::OrderReceipt;

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ClientConfig;

/// Maximum number of body characters copied into log lines.
const LOG_BODY_LIMIT: usize = 500;

/// Errors that can occur when talking to the bookstore API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused connection,
    /// broken body stream).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("request rejected with {status}: {}", reason.as_deref().unwrap_or("no reason given"))]
    Rejected {
        /// HTTP status code.
        status: StatusCode,
        /// Human-readable reason extracted from the error body.
        reason: Option<String>,
    },

    /// A success response whose body did not match the expected schema.
    #[error("unexpected response shape from {endpoint}: {source}")]
    UnexpectedShape {
        /// Endpoint path that produced the body.
        endpoint: String,
        /// Decoding failure.
        #[source]
        source: serde_json::Error,
    },

    /// The endpoint path could not be joined onto the base URL.
    #[error("invalid endpoint {path}: {source}")]
    InvalidEndpoint {
        /// Offending path.
        path: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },

    /// The request body could not be serialized.
    #[error("could not encode request body: {0}")]
    Body(#[source] serde_json::Error),
}

impl ApiError {
    /// Whether the failure happened below HTTP (no response was received).
    #[must_use]
    pub const fn is_connectivity(&self) -> bool {
        matches!(self, Self::Http(_))
    }

    /// Server-provided reason of a rejected request.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Rejected { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }
}

// =============================================================================
// ApiRequest
// =============================================================================

/// A request to one API endpoint.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
    require_auth: bool,
}

impl ApiRequest {
    /// A request with an explicit method and no body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            require_auth: false,
        }
    }

    /// A `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A `POST` request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Body`] if the body cannot be serialized.
    pub fn post<B: Serialize + ?Sized>(path: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        Self::new(Method::POST, path).with_body(body)
    }

    /// Replace the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Body`] if the body cannot be serialized.
    pub fn with_body<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body).map_err(ApiError::Body)?);
        Ok(self)
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a query parameter when a value is present.
    #[must_use]
    pub fn query_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Mark the endpoint as requiring authentication.
    #[must_use]
    pub const fn authenticated(mut self) -> Self {
        self.require_auth = true;
        self
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Endpoint path relative to the API base.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters in insertion order.
    #[must_use]
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// JSON body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    /// Whether the endpoint declares itself as requiring authentication.
    #[must_use]
    pub const fn requires_auth(&self) -> bool {
        self.require_auth
    }

    /// Only these methods carry a body; a body set on `GET` is dropped.
    fn carries_body(&self) -> bool {
        matches!(self.method, Method::POST | Method::PUT | Method::PATCH)
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the bookstore REST API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    page_size: u32,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the configured API base URL.
    ///
    /// No timeout is configured; requests rely on the transport defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (e.g. TLS backend
    /// initialisation failed).
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_url.clone(),
                page_size: config.page_size,
            }),
        })
    }

    /// Base URL every endpoint path is joined onto.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// `page_size` sent with list requests.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.inner.page_size
    }

    /// Resolve the absolute URL of a request, including its query string.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidEndpoint`] if the path cannot be joined.
    pub fn endpoint_url(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        // A leading slash would replace the base path instead of extending it
        let relative = request.path.trim_start_matches('/');
        let mut url = self
            .inner
            .base_url
            .join(relative)
            .map_err(|source| ApiError::InvalidEndpoint {
                path: request.path.clone(),
                source,
            })?;

        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }

        Ok(url)
    }

    /// Send a request and return the raw response.
    ///
    /// `Authorization: Bearer <token>` is attached whenever a token is
    /// present, whether or not the request is marked as requiring
    /// authentication. The status code is not inspected.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if no response was received.
    #[instrument(
        skip(self, request, token),
        fields(method = %request.method, path = %request.path, authenticated = token.is_some())
    )]
    pub async fn send(
        &self,
        request: &ApiRequest,
        token: Option<&SecretString>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.endpoint_url(request)?;
        let mut builder = self.inner.client.request(request.method.clone(), url);

        if let Some(token) = token {
            builder = builder.bearer_auth(token.expose_secret());
        } else if request.require_auth {
            debug!("authenticated endpoint called without a token");
        }

        if let Some(body) = &request.body
            && request.carries_body()
        {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        debug!(status = %response.status(), "response received");
        Ok(response)
    }

    /// Send a request and return the body of a success response.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] for non-success statuses and
    /// [`ApiError::Http`] if the request or body read failed.
    pub async fn fetch_text(
        &self,
        request: &ApiRequest,
        token: Option<&SecretString>,
    ) -> Result<String, ApiError> {
        let response = self.send(request, token).await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(
                status = %status,
                path = %request.path,
                body = %truncate(&body),
                "API returned non-success status"
            );
            return Err(ApiError::Rejected {
                status,
                reason: rejection_reason(&body),
            });
        }

        Ok(body)
    }

    /// Send a request and decode the success body as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnexpectedShape`] if the body does not decode, plus
    /// every error of [`Self::fetch_text`].
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        token: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        let body = self.fetch_text(request, token).await?;
        decode(&request.path, &body)
    }
}

/// Decode a response body into a typed schema.
///
/// # Errors
///
/// Returns [`ApiError::UnexpectedShape`] if the body does not match `T`.
pub fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|source| {
        tracing::error!(
            endpoint,
            error = %source,
            body = %truncate(body),
            "failed to decode API response"
        );
        ApiError::UnexpectedShape {
            endpoint: endpoint.to_string(),
            source,
        }
    })
}

/// Extract a human-readable reason from an error response body.
///
/// The backend answers either `{"detail": "..."}`, `{"error": "..."}` or a
/// field-to-messages mapping such as `{"username": ["already taken"]}`. The
/// mapping is flattened and joined with `", "`.
#[must_use]
pub fn rejection_reason(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    if let Some(object) = value.as_object() {
        for key in ["detail", "error"] {
            if let Some(serde_json::Value::String(message)) = object.get(key)
                && !message.is_empty()
            {
                return Some(message.clone());
            }
        }
    }

    let mut messages = Vec::new();
    collect_messages(&value, &mut messages);
    if messages.is_empty() {
        None
    } else {
        Some(messages.join(", "))
    }
}

fn collect_messages(value: &serde_json::Value, out: &mut Vec<String>) {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => out.push(s.clone()),
        serde_json::Value::Array(items) => items.iter().for_each(|v| collect_messages(v, out)),
        serde_json::Value::Object(map) => map.values().for_each(|v| collect_messages(v, out)),
        _ => {}
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}
