use bytes::Bytes;
use hyper::StatusCode;

/// Failures raised by a [`Transport`](crate::Transport) before any status
/// code is available: connectivity, timeouts, protocol violations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be expressed for the underlying client.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The reqwest client failed to complete the exchange.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Any other transport-specific failure.
    #[error("transport failure: {0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    /// Wrap an arbitrary error as a transport failure.
    pub fn other(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Other(error.into())
    }
}

/// Errors from [`HttpProvider`](crate::HttpProvider) fetches.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The transport failed; no usable response was received.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a client-error, server-error or invalid
    /// status. The payload is kept for diagnostics.
    #[error("HTTP status {status}")]
    HttpStatus { status: StatusCode, body: Bytes },
}

impl ProviderError {
    /// The response status, if the failure carried one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Transport(_) => None,
        }
    }
}

/// Result alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
