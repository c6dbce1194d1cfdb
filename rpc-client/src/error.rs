//! Error types for the JSON-RPC client

use thiserror::Error;

/// Errors that can occur while invoking a remote method
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcError {
    /// The service key has no endpoint in the binding; no request was sent
    #[error("Service '{0}' is not bound to an endpoint")]
    UnboundService(String),

    /// The endpoint answered with a non-200 HTTP status
    #[error("HTTP {status} from RPC endpoint: {body}")]
    Transport { status: u16, body: String },

    /// The endpoint answered 200 but the body is not a usable RPC response
    #[error("Malformed RPC response: {0}")]
    Protocol(String),

    /// Connection, timeout or I/O failure before a status was received
    #[error("Network error: {0}")]
    Network(String),

    /// Parameters could not be encoded as JSON
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The call was cancelled before it was dispatched
    #[error("RPC call was cancelled")]
    Cancelled,
}

impl From<serde_json::Error> for RpcError {
    fn from(error: serde_json::Error) -> Self {
        RpcError::Serialization(error.to_string())
    }
}
