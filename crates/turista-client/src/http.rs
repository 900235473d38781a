//! TuristaClient -- shared HTTP plumbing for the API trait impls.
//!
//! One client instance is cloned into every store; clones share the
//! underlying connection pool and bearer token. The token is wrapped in
//! [`secrecy::SecretString`] and is never logged or included in `Debug`
//! output.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;

use turista_types::error::{ClientError, ContractViolation};

/// Request timeout; marketplace responses are small.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

struct Inner {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<SecretString>>,
}

/// HTTP implementation of the cart, reservation and chat API traits.
///
/// Cheap to clone; all clones share one pool and token.
#[derive(Clone)]
pub struct TuristaClient {
    inner: Arc<Inner>,
}

impl TuristaClient {
    /// Create a client against a service base URL, unauthenticated.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Transport(format!("failed to build HTTP client: {e}")))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url,
                token: RwLock::new(None),
            }),
        })
    }

    /// Construct with a bearer token already in hand.
    pub fn with_token(base_url: impl Into<String>, token: SecretString) -> Result<Self, ClientError> {
        let client = Self::new(base_url)?;
        client.set_token(token);
        Ok(client)
    }

    /// Install the bearer token attached to every subsequent call.
    pub fn set_token(&self, token: SecretString) {
        if let Ok(mut slot) = self.inner.token.write() {
            *slot = Some(token);
        }
    }

    /// Drop the bearer token (logout).
    pub fn clear_token(&self) {
        if let Ok(mut slot) = self.inner.token.write() {
            *slot = None;
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path)
    }

    /// Start a request against a service path, bearer header attached
    /// when a token is configured.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.inner.http.request(method, self.url(path));
        if let Ok(slot) = self.inner.token.read() {
            if let Some(token) = slot.as_ref() {
                builder = builder.bearer_auth(token.expose_secret());
            }
        }
        builder
    }

    /// Send a request and decode a JSON body.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "request rejected by service");
            return Err(error_for_status(status, &body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ContractViolation::MalformedBody(e.to_string()).into())
    }

    /// Send a request where the body, if any, is discarded.
    pub(crate) async fn execute_empty(&self, builder: RequestBuilder) -> Result<(), ClientError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "request rejected by service");
            return Err(error_for_status(status, &body));
        }
        Ok(())
    }

    /// GET a path and decode its JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute(self.request(Method::GET, path)).await
    }
}

/// Map a non-success status to the error taxonomy. 409 means the server
/// refused a transition because the state changed elsewhere.
fn error_for_status(status: StatusCode, body: &str) -> ClientError {
    let message = extract_message(body, status);
    if status == StatusCode::CONFLICT {
        ClientError::Conflict(message)
    } else {
        ClientError::Protocol {
            status: status.as_u16(),
            message,
        }
    }
}

/// Pull a human-readable message out of an error body. The service
/// usually answers `{"message": "..."}`; anything else is passed through
/// raw, falling back to the status reason for empty bodies.
fn extract_message(body: &str, status: StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(message) = value.get(key).and_then(|m| m.as_str()) {
                return message.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string()
    } else {
        trimmed.to_string()
    }
}
