//! Error types for the discovery pipeline.

use thiserror::Error;

/// Error type for discovery operations.
///
/// Each variant names the stage that failed: socket setup and sending,
/// parsing the SSDP reply or the description document, or fetching the
/// description over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// No SSDP reply arrived within the discovery window.
    ///
    /// Recoverable: the caller may retry the search.
    #[error("No SSDP response received before the discovery timeout")]
    Timeout,

    /// The discovery was aborted through its cancel token.
    #[error("Discovery was cancelled")]
    Cancelled,

    /// Socket creation, multicast configuration, send or receive failures,
    /// and HTTP transport failures while fetching the description.
    #[error("Network error: {0}")]
    Network(String),

    /// Malformed SSDP reply or malformed/incomplete description document.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The description document could not be retrieved (non-200 status).
    #[error("Failed to fetch device description from {url}: HTTP {status}")]
    Fetch { status: u16, url: String },
}

impl DiscoveryError {
    pub(crate) fn network(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Network(format!("{}: {}", context, err))
    }
}

/// Convenience Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
