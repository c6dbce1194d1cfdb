//! Camera remote control API
//!
//! Finds a camera with SSDP, binds its ScalarWebAPI services to endpoints and
//! invokes JSON-RPC methods on them. Named operations such as
//! [`CameraClient::get_versions`] are generated from a table; anything else
//! can be called through [`CameraClient::invoke`].
//!
//! ```rust,no_run
//! use camera_api::{discover, CameraError};
//! use camera_discovery::DiscoveryConfig;
//! use serde_json::json;
//!
//! let client = discover(&DiscoveryConfig::default())?;
//!
//! client.set_shoot_mode("still")?;
//! let pictures = client.act_take_picture()?;
//!
//! // Methods without a named operation
//! let event = client.invoke("camera", "getEvent", vec![json!(false)])?;
//! # Ok::<(), CameraError>(())
//! ```

pub mod client;
pub mod error;
pub mod invoker;
pub mod operations;
pub mod service;

pub use client::CameraClient;
pub use error::{CameraError, Result};
pub use operations::{methods, OPERATIONS};
pub use service::Service;

use camera_discovery::DiscoveryConfig;
use tracing::info;

/// Discover the first camera that answers and return a client bound to it.
///
/// The client shares `config.cancel`, if any, so cancelling the token also
/// stops calls made through the client.
pub fn discover(config: &DiscoveryConfig) -> Result<CameraClient> {
    let device = camera_discovery::discover_first(config.clone())?;
    info!(
        "Bound {} service(s) of {} at {}",
        device.binding.len(),
        device.info.friendly_name.as_deref().unwrap_or("unnamed camera"),
        device.response.location
    );

    let client = CameraClient::from_device(device);
    Ok(match config.cancel.clone() {
        Some(token) => client.with_cancel_token(token),
        None => client,
    })
}
