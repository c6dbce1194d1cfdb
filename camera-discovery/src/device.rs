//! Device description retrieval and service binding.
//!
//! The description document lists the ScalarWebAPI services of a camera in
//! the `urn:schemas-sony-com:av` namespace:
//!
//! ```xml
//! <av:X_ScalarWebAPI_ServiceList>
//!   <av:X_ScalarWebAPI_Service>
//!     <av:X_ScalarWebAPI_ServiceType>camera</av:X_ScalarWebAPI_ServiceType>
//!     <av:X_ScalarWebAPI_ActionList_URL>http://192.0.2.5:8080/sony</av:X_ScalarWebAPI_ActionList_URL>
//!   </av:X_ScalarWebAPI_Service>
//! </av:X_ScalarWebAPI_ServiceList>
//! ```
//!
//! Each service binds to `<ActionList_URL>/<ServiceType>`.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{DiscoveryError, Result};

/// Vendor namespace of the ScalarWebAPI elements.
pub const SCALAR_WEB_API_NS: &str = "urn:schemas-sony-com:av";

/// UPnP device description namespace.
pub const UPNP_DEVICE_NS: &str = "urn:schemas-upnp-org:device-1-0";

const SERVICE_LIST: &[u8] = b"X_ScalarWebAPI_ServiceList";
const SERVICE: &[u8] = b"X_ScalarWebAPI_Service";
const SERVICE_TYPE: &[u8] = b"X_ScalarWebAPI_ServiceType";
const ACTION_LIST_URL: &[u8] = b"X_ScalarWebAPI_ActionList_URL";

/// Mapping from service type (e.g. `camera`, `system`, `avContent`) to its
/// action endpoint URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ServiceBinding {
    endpoints: HashMap<String, String>,
}

impl ServiceBinding {
    /// Parse a description document, failing on the first incomplete service entry.
    ///
    /// Use [`DeviceDescription::from_xml`] to keep the well-formed entries
    /// when some are incomplete.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let description = DeviceDescription::from_xml(xml)?;
        match description.skipped.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(description.binding),
        }
    }

    /// Endpoint URL bound to `service_type`.
    pub fn endpoint(&self, service_type: &str) -> Option<&str> {
        self.endpoints.get(service_type).map(String::as_str)
    }

    pub fn contains(&self, service_type: &str) -> bool {
        self.endpoints.contains_key(service_type)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.endpoints.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Service types in sorted order.
    pub fn service_types(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.endpoints.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Bind `service_type` under `action_list_url`; a later entry for the
    /// same service type replaces the earlier one.
    fn bind(&mut self, service_type: &str, action_list_url: &str) {
        let endpoint = format!("{}/{}", action_list_url, service_type);
        if let Some(previous) = self.endpoints.insert(service_type.to_string(), endpoint) {
            debug!("Service '{}' declared twice, replacing {}", service_type, previous);
        }
    }
}

impl FromIterator<(String, String)> for ServiceBinding {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            endpoints: iter.into_iter().collect(),
        }
    }
}

impl From<HashMap<String, String>> for ServiceBinding {
    fn from(endpoints: HashMap<String, String>) -> Self {
        Self { endpoints }
    }
}

/// Identity fields of the root UPnP device, when the document has them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub friendly_name: Option<String>,
    pub manufacturer: Option<String>,
    pub model_name: Option<String>,
    pub udn: Option<String>,
}

/// Parsed device description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceDescription {
    pub info: DeviceInfo,
    /// Every complete service entry
    pub binding: ServiceBinding,
    /// One error per incomplete service entry, in document order
    pub skipped: Vec<DiscoveryError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    ServiceType,
    ActionListUrl,
    FriendlyName,
    Manufacturer,
    ModelName,
    Udn,
}

#[derive(Debug, Default)]
struct PendingService {
    depth: usize,
    service_type: Option<String>,
    action_list_url: Option<String>,
}

impl DeviceDescription {
    /// Parse the description document.
    ///
    /// Incomplete service entries are reported in `skipped` while their
    /// siblings still populate `binding`. A document that is not well-formed
    /// XML fails as a whole.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let mut reader = NsReader::from_str(xml);
        reader.trim_text(true);

        let mut description = DeviceDescription::default();
        let mut depth = 0usize;
        let mut list_depth: Option<usize> = None;
        let mut service: Option<PendingService> = None;
        let mut capture: Option<(Field, usize, String)> = None;

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => return Err(parse_error(reader.buffer_position(), e)),
            };

            match event {
                Event::Start(start) => {
                    depth += 1;
                    let (ns, local) = reader.resolve_element(start.name());
                    let local = local.as_ref();

                    if is_ns(&ns, SCALAR_WEB_API_NS) {
                        if local == SERVICE_LIST && list_depth.is_none() {
                            list_depth = Some(depth);
                        } else if local == SERVICE && list_depth == Some(depth - 1) {
                            service = Some(PendingService {
                                depth,
                                ..Default::default()
                            });
                        } else if service.as_ref().is_some_and(|s| s.depth + 1 == depth) {
                            if local == SERVICE_TYPE {
                                capture = Some((Field::ServiceType, depth, String::new()));
                            } else if local == ACTION_LIST_URL {
                                capture = Some((Field::ActionListUrl, depth, String::new()));
                            }
                        }
                    } else if is_ns(&ns, UPNP_DEVICE_NS) && capture.is_none() {
                        let field = match local {
                            b"friendlyName" => Some(Field::FriendlyName),
                            b"manufacturer" => Some(Field::Manufacturer),
                            b"modelName" => Some(Field::ModelName),
                            b"UDN" => Some(Field::Udn),
                            _ => None,
                        };
                        if let Some(field) = field.filter(|f| description.info.get(*f).is_none()) {
                            capture = Some((field, depth, String::new()));
                        }
                    }
                }
                Event::Text(text) => {
                    if let Some((_, _, buffer)) = capture.as_mut() {
                        let text = text
                            .unescape()
                            .map_err(|e| parse_error(reader.buffer_position(), e))?;
                        buffer.push_str(&text);
                    }
                }
                Event::CData(data) => {
                    if let Some((_, _, buffer)) = capture.as_mut() {
                        buffer.push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::End(_) => {
                    if capture.as_ref().is_some_and(|(_, d, _)| *d == depth) {
                        if let Some((field, _, value)) = capture.take() {
                            description.store(service.as_mut(), field, value.trim());
                        }
                    }
                    if service.as_ref().is_some_and(|s| s.depth == depth) {
                        if let Some(pending) = service.take() {
                            description.finish_service(pending);
                        }
                    }
                    if list_depth == Some(depth) {
                        list_depth = None;
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        debug!(
            "Parsed device description: {} service(s), {} skipped",
            description.binding.len(),
            description.skipped.len()
        );
        Ok(description)
    }

    fn store(&mut self, service: Option<&mut PendingService>, field: Field, value: &str) {
        let value = Some(value.to_string()).filter(|v| !v.is_empty());
        match (field, service) {
            (Field::ServiceType, Some(pending)) => pending.service_type = value,
            (Field::ActionListUrl, Some(pending)) => pending.action_list_url = value,
            (Field::ServiceType | Field::ActionListUrl, None) => {}
            (field, _) => self.info.set(field, value),
        }
    }

    fn finish_service(&mut self, pending: PendingService) {
        match (pending.service_type, pending.action_list_url) {
            (Some(service_type), Some(url)) => self.binding.bind(&service_type, &url),
            (Some(service_type), None) => {
                let err = DiscoveryError::Parse(format!(
                    "Service '{}' has no X_ScalarWebAPI_ActionList_URL",
                    service_type
                ));
                warn!("{}", err);
                self.skipped.push(err);
            }
            (None, _) => {
                let err = DiscoveryError::Parse(
                    "unknown service: entry has no X_ScalarWebAPI_ServiceType".to_string(),
                );
                warn!("{}", err);
                self.skipped.push(err);
            }
        }
    }
}

impl DeviceInfo {
    fn get(&self, field: Field) -> Option<&String> {
        match field {
            Field::FriendlyName => self.friendly_name.as_ref(),
            Field::Manufacturer => self.manufacturer.as_ref(),
            Field::ModelName => self.model_name.as_ref(),
            Field::Udn => self.udn.as_ref(),
            Field::ServiceType | Field::ActionListUrl => None,
        }
    }

    fn set(&mut self, field: Field, value: Option<String>) {
        match field {
            Field::FriendlyName => self.friendly_name = value,
            Field::Manufacturer => self.manufacturer = value,
            Field::ModelName => self.model_name = value,
            Field::Udn => self.udn = value,
            Field::ServiceType | Field::ActionListUrl => {}
        }
    }
}

fn is_ns(resolved: &ResolveResult, uri: &str) -> bool {
    matches!(resolved, ResolveResult::Bound(Namespace(ns)) if *ns == uri.as_bytes())
}

fn parse_error(position: usize, err: impl std::fmt::Display) -> DiscoveryError {
    DiscoveryError::Parse(format!(
        "Failed to parse device description at byte {}: {}",
        position, err
    ))
}

/// Fetch the description document at `location`.
///
/// Anything other than `200 OK` is a [`DiscoveryError::Fetch`].
pub fn fetch_description(http: &reqwest::blocking::Client, location: &str) -> Result<String> {
    let response = http
        .get(location)
        .send()
        .map_err(|e| DiscoveryError::network("Failed to fetch device description", e))?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(DiscoveryError::Fetch {
            status: status.as_u16(),
            url: location.to_string(),
        });
    }

    let xml = response
        .text()
        .map_err(|e| DiscoveryError::network("Failed to read response body", e))?;
    debug!("Fetched device description from {} ({} bytes)", location, xml.len());
    Ok(xml)
}
