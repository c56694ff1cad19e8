use thiserror::Error;

/// Result type alias for node API operations
pub type Result<T> = std::result::Result<T, NodeError>;

/// Errors that can occur when talking to the node RPC API
#[derive(Error, Debug)]
pub enum NodeError {
    /// The API endpoint could not be reached
    #[error("node API unreachable: {0}")]
    Connection(String),

    /// The request did not complete within the client timeout
    #[error("node API request timed out: {0}")]
    Timeout(String),

    /// The node answered with an application-level error, e.g. adding a
    /// filter that is already present
    #[error("node rejected the request: {message}")]
    Rejected {
        /// Error message reported by the node
        message: String,
    },

    /// Unexpected HTTP error without a node error body
    #[error("node API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Response body or status text
        message: String,
    },

    /// The response body could not be decoded
    #[error("invalid response body: {0}")]
    Json(#[from] serde_json::Error),
}

impl NodeError {
    /// True when the node itself was unreachable; the whole cycle should be
    /// skipped and retried later
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout(_))
    }

    /// True when the node processed the request but declined it; for filter
    /// add/remove this means the operation was already satisfied
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}
