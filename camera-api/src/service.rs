/// ScalarWebAPI services a camera may declare in its description document
///
/// The service type doubles as the key into the client's
/// [`ServiceBinding`](camera_discovery::ServiceBinding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Shooting, zoom, exposure and live view control
    Camera,

    /// Device-level settings
    System,

    /// Browsing and transferring recorded content
    AvContent,

    /// API discovery (service protocols and versions)
    Guide,
}

impl Service {
    /// The service type string used in the binding
    pub fn key(&self) -> &'static str {
        match self {
            Service::Camera => "camera",
            Service::System => "system",
            Service::AvContent => "avContent",
            Service::Guide => "guide",
        }
    }

    /// Look up a service by its service type string
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "camera" => Some(Service::Camera),
            "system" => Some(Service::System),
            "avContent" => Some(Service::AvContent),
            "guide" => Some(Service::Guide),
            _ => None,
        }
    }
}

impl AsRef<str> for Service {
    fn as_ref(&self) -> &str {
        self.key()
    }
}
