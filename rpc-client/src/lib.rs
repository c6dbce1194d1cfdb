//! JSON-RPC client for ScalarWebAPI endpoints
//!
//! This crate provides the request/response bodies and a minimal blocking
//! HTTP transport. Which endpoint a call goes to, and how request ids are
//! allocated, is decided by the caller.

mod error;
mod message;

pub use error::RpcError;
pub use message::{RpcRequest, RpcResponse, PROTOCOL_VERSION};

use std::time::Duration;
use tracing::{debug, trace};

/// Default connect timeout for RPC calls
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default read timeout for RPC calls
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Status and body of an HTTP reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// Sends a JSON body to an endpoint and returns the raw reply.
///
/// Non-2xx statuses are replies, not errors; only failures that leave no
/// status to report are returned as [`RpcError::Network`].
pub trait Transport: Send + Sync {
    fn post_json(&self, url: &str, body: &str) -> Result<HttpReply, RpcError>;
}

/// Blocking HTTP transport backed by a `ureq` agent
#[derive(Debug, Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    /// Create a transport with the default timeouts
    pub fn new() -> Self {
        Self::with_timeouts(DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT)
    }

    pub fn with_timeouts(connect: Duration, read: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(connect)
                .timeout_read(read)
                .build(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, url: &str, body: &str) -> Result<HttpReply, RpcError> {
        trace!("POST {} {}", url, body);

        let response = match self
            .agent
            .post(url)
            .set("Content-Type", "application/json")
            .send_string(body)
        {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(e)) => return Err(RpcError::Network(e.to_string())),
        };

        let status = response.status();
        let body = response
            .into_string()
            .map_err(|e| RpcError::Network(e.to_string()))?;
        debug!("RPC endpoint {} answered HTTP {}", url, status);

        Ok(HttpReply { status, body })
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post_json(&self, url: &str, body: &str) -> Result<HttpReply, RpcError> {
        (**self).post_json(url, body)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn post_json(&self, url: &str, body: &str) -> Result<HttpReply, RpcError> {
        (**self).post_json(url, body)
    }
}
