//! JSON-RPC request and response bodies
//!
//! Requests are `{"method", "params", "id", "version"}` objects with
//! positional parameters. Responses are read permissively: only a missing
//! `result` array is treated as a failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RpcError;

/// Protocol version sent with every request.
pub const PROTOCOL_VERSION: &str = "1.0";

/// A single RPC request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub method: String,
    /// Positional parameters; order is part of each method's contract
    pub params: Vec<Value>,
    pub id: u64,
    pub version: String,
}

impl RpcRequest {
    pub fn new(method: impl Into<String>, params: Vec<Value>, id: u64) -> Self {
        Self {
            method: method.into(),
            params,
            id,
            version: PROTOCOL_VERSION.to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String, RpcError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// An RPC response body
///
/// Devices may send `result`, `error`, or both; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub id: Option<Value>,
}

impl RpcResponse {
    /// Parse a response body. Anything that is not a JSON object is a
    /// protocol error.
    pub fn from_json(body: &str) -> Result<Self, RpcError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| RpcError::Protocol(format!("invalid JSON response: {}", e)))?;
        if !value.is_object() {
            return Err(RpcError::Protocol(format!(
                "response is not a JSON object: {}",
                value
            )));
        }
        serde_json::from_value(value)
            .map_err(|e| RpcError::Protocol(format!("invalid RPC response: {}", e)))
    }

    /// Return the `result` array.
    ///
    /// A `result` array wins even when an `error` field is also present.
    pub fn into_result(self) -> Result<Vec<Value>, RpcError> {
        match self.result {
            Some(Value::Array(values)) => Ok(values),
            Some(other) => Err(RpcError::Protocol(format!(
                "result is not an array: {}",
                other
            ))),
            None => Err(RpcError::Protocol(match self.error {
                Some(error) => format!("response has no result (error: {})", error),
                None => "response has no result".to_string(),
            })),
        }
    }

    /// Error code from a `[code, message]` error field, the vendor's usual shape.
    pub fn error_code(&self) -> Option<i64> {
        self.error.as_ref()?.as_array()?.first()?.as_i64()
    }
}
