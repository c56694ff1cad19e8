//! Node RPC client implementation.

use crate::api::SwarmApi;
use crate::error::{NodeError, Result};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default RPC endpoint of a locally running node
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5001";

/// Default request timeout; keeps a hung daemon from stalling the monitor
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the node's HTTP RPC API
#[derive(Clone)]
pub struct NodeClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    base_url: String,
}

/// Error body the node returns on application-level failures
#[derive(Debug, Deserialize)]
struct NodeErrorBody {
    #[serde(rename = "Message", default)]
    message: String,
    #[serde(rename = "Type", default)]
    kind: String,
}

impl NodeClient {
    /// Create a client against the default local endpoint
    #[must_use]
    pub fn new() -> Self {
        NodeClientBuilder::new().build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder() -> NodeClientBuilder {
        NodeClientBuilder::new()
    }

    /// Access swarm endpoints (filters, peers)
    #[must_use]
    pub fn swarm(&self) -> SwarmApi<'_> {
        SwarmApi::new(self)
    }

    /// Perform an RPC call. The node API is POST-only, with arguments in
    /// the query string.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.build_url(path, params);
        debug!(url = %url, "RPC request");

        let response = self
            .inner
            .http
            .post(&url)
            .send()
            .await
            .map_err(classify_transport)?;

        self.handle_response(response).await
    }

    /// Build a URL with query parameters
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}{}", self.inner.base_url, path);

        for (i, (key, value)) in params.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }

        url
    }

    /// Handle an RPC response that returns JSON
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await.map_err(classify_transport)?;
            serde_json::from_str(&body).map_err(NodeError::Json)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Self::classify_failure(status.as_u16(), &body))
        }
    }

    /// Convert a non-success response into a `NodeError`. The node reports
    /// application errors as a JSON body with `"Type": "error"`.
    fn classify_failure(code: u16, body: &str) -> NodeError {
        if let Ok(err) = serde_json::from_str::<NodeErrorBody>(body) {
            if err.kind == "error" {
                return NodeError::Rejected {
                    message: err.message,
                };
            }
        }

        NodeError::Api {
            code,
            message: body.to_string(),
        }
    }
}

impl Default for NodeClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a transport-level reqwest failure onto the error taxonomy
fn classify_transport(err: reqwest::Error) -> NodeError {
    if err.is_timeout() {
        NodeError::Timeout(err.to_string())
    } else {
        NodeError::Connection(err.to_string())
    }
}

/// Builder for configuring a [`NodeClient`]
pub struct NodeClientBuilder {
    base_url: String,
    timeout: Duration,
}

impl NodeClientBuilder {
    /// Create a builder with default settings
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the RPC base URL (useful for testing)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the per-request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client
    #[must_use]
    pub fn build(self) -> NodeClient {
        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(concat!("swarmguard/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build HTTP client");

        NodeClient {
            inner: Arc::new(ClientInner {
                http,
                base_url: self.base_url,
            }),
        }
    }
}

impl Default for NodeClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// URL encoding helper
mod urlencoding {
    pub fn encode(s: &str) -> String {
        url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
    }
}
