//! Camera discovery library
//!
//! Locates cameras exposing the ScalarWebAPI control API using SSDP and
//! resolves their device description into a [`ServiceBinding`]: a map from
//! service type (`camera`, `system`, `avContent`, ...) to the JSON-RPC
//! endpoint of that service.
//!
//! # Quick Start
//!
//! ```no_run
//! use camera_discovery::{discover_first, DiscoveryConfig};
//!
//! let device = discover_first(DiscoveryConfig::default())?;
//! println!("camera endpoint: {:?}", device.binding.endpoint("camera"));
//! # Ok::<(), camera_discovery::DiscoveryError>(())
//! ```
//!
//! # Iterator-based Discovery
//!
//! Every camera answering within the discovery window:
//!
//! ```no_run
//! use camera_discovery::get_iter;
//!
//! for device in get_iter().flatten() {
//!     println!("Found {:?} at {}", device.info.friendly_name, device.response.location);
//! }
//! ```
//!
//! # Error Reporting
//!
//! The `get*` helpers log failures and leave the affected devices out; if
//! the socket cannot be set up they return nothing. Use
//! [`DiscoveryIterator::new`] to receive socket-setup errors and per-device
//! errors as values.
//!
//! ```no_run
//! use camera_discovery::{DiscoveryConfig, DiscoveryError, DiscoveryIterator};
//!
//! let devices = DiscoveryIterator::new(DiscoveryConfig::default())?;
//! for device in devices {
//!     match device {
//!         Ok(device) => println!("{}", device.response.location),
//!         Err(DiscoveryError::Cancelled) => break,
//!         Err(e) => eprintln!("{}", e),
//!     }
//! }
//! # Ok::<(), DiscoveryError>(())
//! ```

mod config;
pub mod device;
mod discovery;
mod error;
pub mod ssdp;

pub use config::{CancelToken, DiscoveryConfig, DEFAULT_SEARCH_TARGET, SSDP_MULTICAST_ADDR, SSDP_PORT};
pub use device::{fetch_description, DeviceDescription, DeviceInfo, ServiceBinding};
pub use discovery::{DiscoveredDevice, DiscoveryIterator};
pub use error::{DiscoveryError, Result};
pub use ssdp::{parse_ssdp_response, DiscoveryResponse, SsdpClient};

use tracing::warn;

/// Send one M-SEARCH and return the first SSDP reply, without fetching the
/// description.
///
/// Returns [`DiscoveryError::Timeout`] when nothing answers within
/// `config.timeout`.
pub fn search(config: &DiscoveryConfig) -> Result<DiscoveryResponse> {
    SsdpClient::new(config)?.search_first(&config.search_target)
}

/// Discover the first camera and resolve its service binding.
///
/// Returns [`DiscoveryError::Timeout`] when nothing answers within
/// `config.timeout`, or the error of the first stage that failed for the
/// first device that answered.
pub fn discover_first(config: DiscoveryConfig) -> Result<DiscoveredDevice> {
    DiscoveryIterator::new(config)?
        .next()
        .unwrap_or(Err(DiscoveryError::Timeout))
}

/// Discover all cameras on the local network with the default configuration.
///
/// Devices whose description cannot be resolved are logged and left out.
/// For errors as values use [`DiscoveryIterator::new`] instead.
pub fn get() -> Vec<DiscoveredDevice> {
    get_with_config(DiscoveryConfig::default())
}

/// Discover all cameras on the local network with a custom configuration.
pub fn get_with_config(config: DiscoveryConfig) -> Vec<DiscoveredDevice> {
    get_iter_with_config(config)
        .filter_map(|result| match result {
            Ok(device) => Some(device),
            Err(e) => {
                warn!("Discovery error: {}", e);
                None
            }
        })
        .collect()
}

/// Get an iterator for discovering cameras with the default configuration.
pub fn get_iter() -> DiscoveryIterator {
    get_iter_with_config(DiscoveryConfig::default())
}

/// Get an iterator for discovering cameras with a custom configuration.
///
/// If the socket cannot be set up the failure is logged and the iterator is
/// empty; use [`DiscoveryIterator::new`] to receive that error instead.
pub fn get_iter_with_config(config: DiscoveryConfig) -> DiscoveryIterator {
    DiscoveryIterator::new(config).unwrap_or_else(|e| {
        warn!("Failed to start discovery: {}", e);
        DiscoveryIterator::empty()
    })
}
