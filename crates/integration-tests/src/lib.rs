//! Integration test harness for Bookshelf.
//!
//! [`TestBackend`] is an in-process HTTP server standing in for the
//! bookstore REST API. Tests register canned replies per method and path,
//! point a [`ClientConfig`] at it and inspect the requests the client sent.
//!
//! Paths are registered without the `/api` prefix, so `/create-order/` answers
//! `POST http://127.0.0.1:<port>/api/create-order/`. Unregistered routes answer
//! 404 with the backend's `{"detail": "Not found."}` body.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use bookshelf_client::ClientConfig;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

pub mod fixtures;

/// A request as the backend received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path without the `/api` prefix.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    /// Parsed JSON body, `None` for an empty or non-JSON body.
    pub body: Option<Value>,
}

impl RecordedRequest {
    /// First value of a query parameter.
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone)]
struct Reply {
    status: StatusCode,
    body: String,
}

#[derive(Debug, Default)]
struct BackendState {
    routes: HashMap<(Method, String), Reply>,
    requests: Vec<RecordedRequest>,
}

type SharedState = Arc<Mutex<BackendState>>;

/// In-process stand-in for the bookstore API.
pub struct TestBackend {
    api_url: Url,
    state: SharedState,
    server: JoinHandle<()>,
}

impl TestBackend {
    /// Bind an ephemeral local port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let api_url = Url::parse(&format!("http://{addr}/api/"))
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
        let state = SharedState::default();

        let app = Router::new().fallback(handle).with_state(Arc::clone(&state));
        let server = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                tracing::error!(error = %err, "test backend stopped");
            }
        });

        Ok(Self {
            api_url,
            state,
            server,
        })
    }

    /// Answer `method path` with a JSON body.
    pub fn reply(&self, method: Method, path: &str, status: StatusCode, body: &Value) -> &Self {
        self.reply_raw(method, path, status, &body.to_string())
    }

    /// Answer `method path` with a verbatim body.
    pub fn reply_raw(&self, method: Method, path: &str, status: StatusCode, body: &str) -> &Self {
        self.lock().routes.insert(
            (method, path.to_string()),
            Reply {
                status,
                body: body.to_string(),
            },
        );
        self
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Requests received for `method path`.
    #[must_use]
    pub fn requests_to(&self, method: &Method, path: &str) -> Vec<RecordedRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|request| request.method == *method && request.path == path)
            .cloned()
            .collect()
    }

    /// Base URL of the API, with the trailing slash the client expects.
    #[must_use]
    pub const fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Client configuration pointed at this backend.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        ClientConfig::for_api(self.api_url.clone())
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for TestBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn handle(
    State(state): State<SharedState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().strip_prefix("/api").unwrap_or(uri.path()).to_string();
    let header = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(String::from)
    };

    let request = RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: uri
            .query()
            .map(|query| url::form_urlencoded::parse(query.as_bytes()).into_owned().collect())
            .unwrap_or_default(),
        authorization: header(AUTHORIZATION),
        content_type: header(CONTENT_TYPE),
        body: serde_json::from_slice(&body).ok(),
    };

    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
    state.requests.push(request);

    match state.routes.get(&(method, path)) {
        Some(reply) => (
            reply.status,
            [(CONTENT_TYPE, "application/json")],
            reply.body.clone(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [(CONTENT_TYPE, "application/json")],
            json!({"detail": "Not found."}).to_string(),
        )
            .into_response(),
    }
}
