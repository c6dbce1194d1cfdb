//! Configuration for SSDP discovery and description retrieval.

use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// IPv4 SSDP multicast group.
pub const SSDP_MULTICAST_ADDR: Ipv4Addr = Ipv4Addr::new(239, 255, 255, 250);

/// SSDP port.
pub const SSDP_PORT: u16 = 1900;

/// Search target advertised by ScalarWebAPI cameras.
pub const DEFAULT_SEARCH_TARGET: &str = "urn:schemas-sony-com:service:ScalarWebAPI:1";

/// Flag shared between a caller and an in-flight discovery.
///
/// Cloning the token shares the flag; calling [`CancelToken::cancel`] on any
/// clone stops every receive loop observing it within one poll slice.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Configuration for a discovery run.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// SSDP search target (`ST` header)
    /// Default: `urn:schemas-sony-com:service:ScalarWebAPI:1`
    pub search_target: String,

    /// How long to collect SSDP replies
    /// Default: 5 seconds
    pub timeout: Duration,

    /// Value of the `MX` header
    /// Default: 3
    pub mx: u32,

    /// Local interface for outbound multicast (`IP_MULTICAST_IF`)
    /// Default: None (the OS picks the interface)
    pub interface: Option<Ipv4Addr>,

    /// Destination of the M-SEARCH datagram
    /// Default: 239.255.255.250:1900
    pub target: SocketAddrV4,

    /// Receive buffer for a single SSDP reply
    /// Default: 1024 bytes
    pub receive_buffer_size: usize,

    /// Timeout for the description document GET
    /// Default: 10 seconds
    pub http_timeout: Duration,

    /// Optional token for aborting the discovery
    pub cancel: Option<CancelToken>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            search_target: DEFAULT_SEARCH_TARGET.to_string(),
            timeout: Duration::from_secs(5),
            mx: 3,
            interface: None,
            target: SocketAddrV4::new(SSDP_MULTICAST_ADDR, SSDP_PORT),
            receive_buffer_size: 1024,
            http_timeout: Duration::from_secs(10),
            cancel: None,
        }
    }
}

impl DiscoveryConfig {
    /// Create a new DiscoveryConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_target(mut self, search_target: impl Into<String>) -> Self {
        self.search_target = search_target.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the `MX` header; values below 1 are raised to 1.
    pub fn with_mx(mut self, mx: u32) -> Self {
        self.mx = mx.max(1);
        self
    }

    pub fn with_interface(mut self, interface: Ipv4Addr) -> Self {
        self.interface = Some(interface);
        self
    }

    /// Send the M-SEARCH somewhere other than the multicast group, e.g. a
    /// device simulator listening on a unicast address.
    pub fn with_target(mut self, target: SocketAddrV4) -> Self {
        self.target = target;
        self
    }

    pub fn with_receive_buffer_size(mut self, size: usize) -> Self {
        self.receive_buffer_size = size.max(1);
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}
