use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors produced while building or parsing core values
#[derive(Error, Debug)]
pub enum CoreError {
    /// A CIDR string could not be parsed
    #[error("invalid CIDR '{0}'")]
    InvalidCidr(String),

    /// A prefix length outside 0..=32
    #[error("invalid prefix length /{0}")]
    InvalidPrefix(u8),

    /// A swarm filter string is not an IPv4 CIDR multiaddr
    #[error("invalid filter multiaddr '{0}'")]
    InvalidMultiaddr(String),

    /// Threshold pair that would defeat hysteresis
    #[error("relax threshold {relax_ms}ms must be strictly below restrict threshold {restrict_ms}ms")]
    InvalidThresholds {
        /// Latency above which the node restricts itself
        restrict_ms: i64,
        /// Latency below which the node reopens
        relax_ms: i64,
    },
}
