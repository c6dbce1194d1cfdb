//! SSDP (Simple Service Discovery Protocol) client and reply parser
//!
//! Sends a single M-SEARCH datagram and reads the HTTP-over-UDP replies
//! until the discovery window closes.

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use serde::Serialize;
use socket2::{Domain, Protocol, Socket, Type};
use tracing::{debug, trace};

use crate::config::DiscoveryConfig;
use crate::error::{DiscoveryError, Result};

/// Upper bound on a single blocking receive, so cancellation is observed promptly.
const POLL_SLICE: Duration = Duration::from_millis(100);

/// One parsed SSDP search reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryResponse {
    /// URL of the device description document
    pub location: String,
    /// Search target that matched (`ST`)
    pub service_type: String,
    /// Unique service name (`USN`)
    pub unique_service_name: String,
    /// `max-age` from `CACHE-CONTROL`, if present and well formed
    pub cache_seconds: Option<u32>,
    /// SERVER header, if present
    pub server: Option<String>,
    /// Sender of the datagram; `None` when parsed from raw bytes
    pub from: Option<SocketAddr>,
}

/// SSDP client owning the discovery socket.
pub struct SsdpClient {
    socket: UdpSocket,
    config: DiscoveryConfig,
}

impl SsdpClient {
    /// Create the UDP socket and apply the multicast options from `config`.
    pub fn new(config: &DiscoveryConfig) -> Result<Self> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
            .map_err(|e| DiscoveryError::network("Failed to create UDP socket", e))?;

        // Replies must come from the local segment only.
        socket
            .set_multicast_ttl_v4(1)
            .map_err(|e| DiscoveryError::network("Failed to set multicast TTL", e))?;
        socket
            .set_multicast_loop_v4(true)
            .map_err(|e| DiscoveryError::network("Failed to set multicast loop", e))?;

        if let Some(interface) = config.interface {
            socket
                .set_multicast_if_v4(&interface)
                .map_err(|e| DiscoveryError::network("Failed to set multicast interface", e))?;
            debug!("SSDP multicast bound to interface {}", interface);
        }

        let bind_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0));
        socket
            .bind(&bind_addr.into())
            .map_err(|e| DiscoveryError::network("Failed to bind UDP socket", e))?;

        Ok(Self {
            socket: socket.into(),
            config: config.clone(),
        })
    }

    /// Send an M-SEARCH request and return an iterator over the replies.
    ///
    /// The iterator owns the socket; dropping it closes the socket.
    pub fn search(self, search_target: &str) -> Result<SsdpResponseIterator> {
        let request = build_msearch(search_target, self.config.mx);

        self.socket
            .send_to(request.as_bytes(), self.config.target)
            .map_err(|e| DiscoveryError::network("Failed to send M-SEARCH", e))?;
        debug!("M-SEARCH sent to {} (ST={})", self.config.target, search_target);

        Ok(SsdpResponseIterator::new(self))
    }

    /// Send an M-SEARCH request and return the first well-formed reply.
    pub fn search_first(self, search_target: &str) -> Result<DiscoveryResponse> {
        self.search(search_target)?
            .next()
            .unwrap_or(Err(DiscoveryError::Timeout))
    }
}

/// Build the M-SEARCH datagram.
pub(crate) fn build_msearch(search_target: &str, mx: u32) -> String {
    [
        "M-SEARCH * HTTP/1.1".to_string(),
        format!("HOST: {}:{}", crate::config::SSDP_MULTICAST_ADDR, crate::config::SSDP_PORT),
        "MAN: \"ssdp:discover\"".to_string(),
        format!("ST: {}", search_target),
        format!("MX: {}", mx),
        String::new(),
        String::new(),
    ]
    .join("\r\n")
}

/// Iterator over SSDP replies, bounded by the discovery timeout.
///
/// Yields `Ok` for every reply that parses, skips malformed datagrams, and
/// ends with `None` once the window has elapsed. Cancellation and socket
/// failures are yielded once as `Err` and end the iteration.
pub struct SsdpResponseIterator {
    client: SsdpClient,
    buffer: Vec<u8>,
    deadline: Instant,
    finished: bool,
}

impl SsdpResponseIterator {
    fn new(client: SsdpClient) -> Self {
        let buffer = vec![0; client.config.receive_buffer_size];
        let deadline = Instant::now() + client.config.timeout;
        Self {
            client,
            buffer,
            deadline,
            finished: false,
        }
    }

    fn fail(&mut self, err: DiscoveryError) -> Option<Result<DiscoveryResponse>> {
        self.finished = true;
        Some(Err(err))
    }
}

impl Iterator for SsdpResponseIterator {
    type Item = Result<DiscoveryResponse>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }
            if self.client.config.is_cancelled() {
                return self.fail(DiscoveryError::Cancelled);
            }

            let now = Instant::now();
            if now >= self.deadline {
                trace!("SSDP discovery window elapsed");
                self.finished = true;
                return None;
            }

            let slice = (self.deadline - now).min(POLL_SLICE);
            if let Err(e) = self.client.socket.set_read_timeout(Some(slice)) {
                return self.fail(DiscoveryError::network("Failed to set read timeout", e));
            }

            match self.client.socket.recv_from(&mut self.buffer) {
                Ok((size, from)) => match parse_ssdp_response(&self.buffer[..size]) {
                    Ok(mut response) => {
                        debug!("SSDP reply from {}: {}", from, response.location);
                        response.from = Some(from);
                        return Some(Ok(response));
                    }
                    Err(e) => {
                        debug!("Ignoring SSDP datagram from {}: {}", from, e);
                    }
                },
                Err(e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut => {}
                Err(e) => return self.fail(DiscoveryError::network("Socket error", e)),
            }
        }
    }
}

/// Parse an SSDP reply: an HTTP response head carried in a UDP payload.
pub fn parse_ssdp_response(raw: &[u8]) -> Result<DiscoveryResponse> {
    let text = String::from_utf8_lossy(raw);
    let mut lines = text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line));

    let status_line = lines
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .ok_or_else(|| DiscoveryError::Parse("Empty SSDP response".to_string()))?;
    check_status_line(status_line)?;

    let headers = parse_headers(lines);

    let location = headers
        .get("LOCATION")
        .filter(|value| !value.is_empty())
        .cloned()
        .ok_or_else(|| DiscoveryError::Parse("SSDP response has no LOCATION header".to_string()))?;

    Ok(DiscoveryResponse {
        location,
        service_type: headers.get("ST").cloned().unwrap_or_default(),
        unique_service_name: headers.get("USN").cloned().unwrap_or_default(),
        cache_seconds: headers.get("CACHE-CONTROL").and_then(|value| parse_max_age(value)),
        server: headers.get("SERVER").cloned(),
        from: None,
    })
}

fn check_status_line(line: &str) -> Result<()> {
    let mut parts = line.split_whitespace();
    let version = parts.next().unwrap_or_default();
    if !version.to_ascii_uppercase().starts_with("HTTP/") {
        return Err(DiscoveryError::Parse(format!("Not an HTTP response: {}", line)));
    }
    match parts.next().map(str::parse::<u16>) {
        Some(Ok(200)) => Ok(()),
        Some(Ok(code)) => Err(DiscoveryError::Parse(format!("Unexpected SSDP status {}", code))),
        _ => Err(DiscoveryError::Parse(format!("Malformed status line: {}", line))),
    }
}

/// Collect headers into a map keyed by upper-cased name.
///
/// Continuation lines (leading space or tab) are folded into the previous
/// header. Parsing stops at the first blank line.
fn parse_headers<'a>(lines: impl Iterator<Item = &'a str>) -> HashMap<String, String> {
    let mut headers: HashMap<String, String> = HashMap::new();
    let mut last: Option<String> = None;

    for line in lines {
        if line.trim().is_empty() {
            break;
        }

        if line.starts_with([' ', '\t']) {
            if let Some(value) = last.as_ref().and_then(|name| headers.get_mut(name)) {
                if !value.is_empty() {
                    value.push(' ');
                }
                value.push_str(line.trim());
            }
            continue;
        }

        match line.split_once(':') {
            Some((name, value)) if !name.trim().is_empty() => {
                let name = name.trim().to_ascii_uppercase();
                headers.insert(name.clone(), value.trim().to_string());
                last = Some(name);
            }
            _ => {
                trace!("Skipping malformed header line: '{}'", line);
                last = None;
            }
        }
    }

    headers
}

/// Extract the `max-age` directive from a `CACHE-CONTROL` value.
fn parse_max_age(value: &str) -> Option<u32> {
    value.split(',').find_map(|directive| {
        let (name, seconds) = directive.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("max-age") {
            seconds.trim().trim_matches('"').parse().ok()
        } else {
            None
        }
    })
}
