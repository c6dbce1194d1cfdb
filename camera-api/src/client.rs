use std::sync::atomic::{AtomicU64, Ordering};

use camera_discovery::{CancelToken, DeviceInfo, DiscoveredDevice, ServiceBinding};
use rpc_client::{HttpTransport, RpcError, RpcRequest, Transport};
use serde_json::Value;
use tracing::debug;

use crate::invoker;
use crate::service::Service;

/// A client for invoking ScalarWebAPI methods on one camera
///
/// The client owns the camera's [`ServiceBinding`] and a request id counter.
/// Ids start at 1 and are shared by every service key, so two calls made
/// through the same client never carry the same id. The client is `Send` and
/// `Sync`; calls from several threads are allowed, each one blocking its
/// caller until the reply or a timeout.
///
/// # Example
/// ```rust,no_run
/// use camera_api::{discover, CameraError};
/// use camera_discovery::DiscoveryConfig;
///
/// let client = discover(&DiscoveryConfig::default())?;
/// let versions = client.get_versions()?;
/// println!("{:?}", versions);
/// # Ok::<(), CameraError>(())
/// ```
#[derive(Debug)]
pub struct CameraClient<T = HttpTransport> {
    binding: ServiceBinding,
    info: Option<DeviceInfo>,
    transport: T,
    next_id: AtomicU64,
    cancel: Option<CancelToken>,
}

impl CameraClient<HttpTransport> {
    /// Create a client for `binding` using the default HTTP transport
    pub fn new(binding: ServiceBinding) -> Self {
        Self::with_transport(binding, HttpTransport::new())
    }

    /// Create a client for a device found by discovery
    pub fn from_device(device: DiscoveredDevice) -> Self {
        let mut client = Self::new(device.binding);
        client.info = Some(device.info);
        client
    }
}

impl<T: Transport> CameraClient<T> {
    /// Create a client with a custom transport
    pub fn with_transport(binding: ServiceBinding, transport: T) -> Self {
        Self {
            binding,
            info: None,
            transport,
            next_id: AtomicU64::new(1),
            cancel: None,
        }
    }

    /// Refuse further calls once `token` is cancelled.
    ///
    /// A call already waiting on the network is not interrupted; it ends with
    /// its reply or the transport's timeout.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn binding(&self) -> &ServiceBinding {
        &self.binding
    }

    /// Device details from the description document, when discovered
    pub fn info(&self) -> Option<&DeviceInfo> {
        self.info.as_ref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Endpoint bound to `service_key`
    pub fn endpoint(&self, service_key: &str) -> Result<&str, RpcError> {
        self.binding
            .endpoint(service_key)
            .ok_or_else(|| RpcError::UnboundService(service_key.to_string()))
    }

    /// Endpoint of the `camera` service, which every usable camera declares
    pub fn require_camera(&self) -> Result<&str, RpcError> {
        self.endpoint(Service::Camera.key())
    }

    /// Invoke `method` on the service bound to `service_key`.
    ///
    /// Returns the full `result` array. An unbound key fails before an id is
    /// allocated or anything is sent.
    pub fn invoke(
        &self,
        service_key: &str,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Vec<Value>, RpcError> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            debug!("Refusing {} on cancelled client", method);
            return Err(RpcError::Cancelled);
        }

        let endpoint = self.endpoint(service_key)?;
        let request = RpcRequest::new(method, params, self.next_id());
        invoker::post(&self.transport, endpoint, &request)
    }

    /// Invoke `method` and return the first value of its `result` array.
    pub fn invoke_single(
        &self,
        service_key: &str,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Value, RpcError> {
        self.invoke(service_key, method, params)?
            .into_iter()
            .next()
            .ok_or_else(|| RpcError::Protocol(format!("{} returned an empty result", method)))
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}
