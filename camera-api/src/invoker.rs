//! The generic RPC primitive every camera operation is built on

use camera_discovery::ServiceBinding;
use rpc_client::{RpcError, RpcRequest, RpcResponse, Transport};
use serde_json::Value;
use tracing::{debug, warn};

/// Invoke `request` on the endpoint bound to `service_key`.
///
/// An unbound `service_key` fails with [`RpcError::UnboundService`] before
/// anything is sent. On success the whole `result` array is returned; how
/// many values it holds depends on the method.
pub fn invoke<T: Transport + ?Sized>(
    transport: &T,
    binding: &ServiceBinding,
    service_key: &str,
    request: &RpcRequest,
) -> Result<Vec<Value>, RpcError> {
    let endpoint = binding
        .endpoint(service_key)
        .ok_or_else(|| RpcError::UnboundService(service_key.to_string()))?;
    post(transport, endpoint, request)
}

/// POST `request` to `endpoint` and unwrap the `result` array.
pub fn post<T: Transport + ?Sized>(
    transport: &T,
    endpoint: &str,
    request: &RpcRequest,
) -> Result<Vec<Value>, RpcError> {
    let body = request.to_json()?;
    debug!("Invoking {} (id {}) on {}", request.method, request.id, endpoint);

    let reply = transport.post_json(endpoint, &body)?;
    if reply.status != 200 {
        warn!("{} (id {}) failed with HTTP {}", request.method, request.id, reply.status);
        return Err(RpcError::Transport {
            status: reply.status,
            body: reply.body,
        });
    }

    RpcResponse::from_json(&reply.body)?.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpc_client::HttpReply;
    use serde_json::json;
    use std::sync::Mutex;

    struct CannedTransport {
        reply: Result<HttpReply, RpcError>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl CannedTransport {
        fn new(status: u16, body: &str) -> Self {
            Self {
                reply: Ok(HttpReply {
                    status,
                    body: body.to_string(),
                }),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for CannedTransport {
        fn post_json(&self, url: &str, body: &str) -> Result<HttpReply, RpcError> {
            self.calls.lock().unwrap().push((url.to_string(), body.to_string()));
            self.reply.clone()
        }
    }

    fn binding() -> ServiceBinding {
        [("camera".to_string(), "http://192.0.2.5:12345/sony/camera".to_string())]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_invoke_posts_to_bound_endpoint() {
        let transport = CannedTransport::new(200, r#"{"result":[{"cameraStatus":"IDLE"}],"id":1}"#);
        let request = RpcRequest::new("getEvent", vec![], 1);

        let result = invoke(&transport, &binding(), "camera", &request).unwrap();

        assert_eq!(result, vec![json!({"cameraStatus": "IDLE"})]);
        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "http://192.0.2.5:12345/sony/camera");
        let body: Value = serde_json::from_str(&calls[0].1).unwrap();
        assert_eq!(
            body,
            json!({"method": "getEvent", "params": [], "id": 1, "version": "1.0"})
        );
    }

    #[test]
    fn test_unbound_service_sends_nothing() {
        let transport = CannedTransport::new(200, r#"{"result":[]}"#);
        let request = RpcRequest::new("getContentList", vec![], 1);

        let err = invoke(&transport, &binding(), "avContent", &request).unwrap_err();

        assert_eq!(err, RpcError::UnboundService("avContent".to_string()));
        assert!(transport.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_non_200_is_transport_error() {
        let transport = CannedTransport::new(404, "Not Found");
        let request = RpcRequest::new("getEvent", vec![], 1);

        let err = invoke(&transport, &binding(), "camera", &request).unwrap_err();

        assert_eq!(
            err,
            RpcError::Transport {
                status: 404,
                body: "Not Found".to_string()
            }
        );
    }

    #[test]
    fn test_missing_result_is_protocol_error() {
        let transport = CannedTransport::new(200, r#"{"error":[1,"Any"],"id":1}"#);
        let request = RpcRequest::new("actTakePicture", vec![], 1);

        let err = invoke(&transport, &binding(), "camera", &request).unwrap_err();
        assert!(matches!(err, RpcError::Protocol(_)));
    }

    #[test]
    fn test_array_body_is_protocol_error() {
        let transport = CannedTransport::new(200, r#"[["IDLE"]]"#);
        let request = RpcRequest::new("getEvent", vec![], 1);

        let err = invoke(&transport, &binding(), "camera", &request).unwrap_err();
        assert!(matches!(err, RpcError::Protocol(_)));
    }

    #[test]
    fn test_network_error_passes_through() {
        let transport = CannedTransport {
            reply: Err(RpcError::Network("connection refused".to_string())),
            calls: Mutex::new(Vec::new()),
        };
        let request = RpcRequest::new("getEvent", vec![], 1);

        let err = post(&transport, "http://192.0.2.5:12345/sony/camera", &request).unwrap_err();
        assert_eq!(err, RpcError::Network("connection refused".to_string()));
    }
}
