use camera_discovery::DiscoveryError;
use rpc_client::RpcError;
use thiserror::Error;

/// Errors surfaced by the camera client
///
/// Each variant identifies the stage that failed: discovery and binding, or
/// an RPC invocation against a bound endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    /// Sending, parsing, fetching or binding during discovery failed
    #[error("Discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    /// An RPC invocation failed
    #[error("RPC failed: {0}")]
    Rpc(#[from] RpcError),
}

impl CameraError {
    /// Whether a fresh attempt may succeed without changing anything.
    ///
    /// Only a discovery timeout qualifies; nothing is retried automatically.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CameraError::Discovery(DiscoveryError::Timeout))
    }
}

/// Type alias for results that can return a CameraError
pub type Result<T> = std::result::Result<T, CameraError>;
