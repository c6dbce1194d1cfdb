//! Discovery pipeline and iterator implementation.
//!
//! For every SSDP reply the iterator:
//! 1. Skips locations it has already resolved
//! 2. Fetches the device description via HTTP
//! 3. Builds the service binding and device info
//! 4. Yields the result, or the error of the stage that failed

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::{CancelToken, DiscoveryConfig};
use crate::device::{fetch_description, DeviceDescription, DeviceInfo, ServiceBinding};
use crate::error::{DiscoveryError, Result};
use crate::ssdp::{DiscoveryResponse, SsdpClient, SsdpResponseIterator};

/// A camera located by SSDP whose description has been resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveredDevice {
    pub response: DiscoveryResponse,
    pub info: DeviceInfo,
    pub binding: ServiceBinding,
    /// Service entries left out of `binding` because they were incomplete
    #[serde(skip)]
    pub skipped: Vec<DiscoveryError>,
}

/// Iterator that discovers cameras on the local network.
///
/// Items are produced lazily while the discovery window is open; the
/// iteration ends when it closes. Replies for an already-seen location are
/// dropped. A failure to fetch or parse one device's description is yielded
/// as `Err` and iteration continues with the next reply.
///
/// # Examples
///
/// ```no_run
/// use camera_discovery::{DiscoveryConfig, DiscoveryIterator};
///
/// for device in DiscoveryIterator::new(DiscoveryConfig::default())? {
///     match device {
///         Ok(device) => println!("{:?}", device.binding.endpoint("camera")),
///         Err(e) => eprintln!("skipping device: {}", e),
///     }
/// }
/// # Ok::<(), camera_discovery::DiscoveryError>(())
/// ```
pub struct DiscoveryIterator {
    responses: Option<SsdpResponseIterator>,
    seen_locations: HashSet<String>,
    http_client: reqwest::blocking::Client,
    cancel: Option<CancelToken>,
}

impl DiscoveryIterator {
    /// Open the socket, send the M-SEARCH and return the iterator.
    pub fn new(config: DiscoveryConfig) -> Result<Self> {
        let http_client = reqwest::blocking::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| DiscoveryError::network("Failed to create HTTP client", e))?;

        let responses = SsdpClient::new(&config)?.search(&config.search_target)?;

        Ok(Self {
            responses: Some(responses),
            seen_locations: HashSet::new(),
            http_client,
            cancel: config.cancel,
        })
    }

    /// An iterator that yields nothing.
    pub(crate) fn empty() -> Self {
        Self {
            responses: None,
            seen_locations: HashSet::new(),
            http_client: reqwest::blocking::Client::new(),
            cancel: None,
        }
    }

    fn resolve(&self, response: DiscoveryResponse) -> Result<DiscoveredDevice> {
        let xml = fetch_description(&self.http_client, &response.location)?;
        let description = DeviceDescription::from_xml(&xml)?;

        for err in &description.skipped {
            warn!("{}: skipped service entry: {}", response.location, err);
        }
        debug!(
            "Bound {} service(s) for {}",
            description.binding.len(),
            response.location
        );

        Ok(DiscoveredDevice {
            response,
            info: description.info,
            binding: description.binding,
            skipped: description.skipped,
        })
    }
}

impl Iterator for DiscoveryIterator {
    type Item = Result<DiscoveredDevice>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let response = match self.responses.as_mut()?.next() {
                Some(Ok(response)) => response,
                Some(Err(e)) => {
                    // Cancellation and socket failures end the discovery.
                    self.responses = None;
                    return Some(Err(e));
                }
                None => {
                    self.responses = None;
                    return None;
                }
            };

            if !self.seen_locations.insert(response.location.clone()) {
                trace!("Duplicate SSDP reply for {}", response.location);
                continue;
            }

            // A reply may arrive just before cancellation; do not start its fetch.
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                debug!("Discovery cancelled before fetching {}", response.location);
                self.responses = None;
                return Some(Err(DiscoveryError::Cancelled));
            }

            return Some(self.resolve(response));
        }
    }
}
