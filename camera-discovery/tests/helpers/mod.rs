//! Test helpers: description fixtures and a loopback SSDP responder

#![allow(dead_code)]

use std::fs;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Load a description document from the fixtures directory
pub fn load_fixture(filename: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(filename);

    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", filename, e))
}

/// SSDP search reply pointing at `location`
pub fn ssdp_reply(location: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\n\
         CACHE-CONTROL: max-age=1800\r\n\
         EXT:\r\n\
         LOCATION: {}\r\n\
         SERVER: UPnP/1.0 SonyImagingDevice/1.0\r\n\
         ST: urn:schemas-sony-com:service:ScalarWebAPI:1\r\n\
         USN: uuid:00000000-0005-0010-8000-10a5d09bbeda::urn:schemas-sony-com:service:ScalarWebAPI:1\r\n\
         X-AV-Physical-Unit-Info: pa=\"ILCE-6000\";\r\n\
         \r\n",
        location
    )
}

/// A device simulator on 127.0.0.1 that answers one M-SEARCH with a fixed
/// list of datagrams.
pub struct SsdpResponder {
    pub addr: SocketAddrV4,
    handle: Option<JoinHandle<Vec<String>>>,
}

impl SsdpResponder {
    pub fn spawn(replies: Vec<String>) -> Self {
        let socket = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).expect("bind responder");
        socket
            .set_read_timeout(Some(Duration::from_secs(5)))
            .expect("set responder timeout");
        let addr = match socket.local_addr().expect("responder addr") {
            SocketAddr::V4(addr) => addr,
            SocketAddr::V6(_) => unreachable!("bound to an IPv4 address"),
        };

        let handle = thread::spawn(move || {
            let mut buffer = [0u8; 2048];
            let mut requests = Vec::new();
            if let Ok((size, from)) = socket.recv_from(&mut buffer) {
                requests.push(String::from_utf8_lossy(&buffer[..size]).to_string());
                for reply in &replies {
                    socket.send_to(reply.as_bytes(), from).expect("send reply");
                }
            }
            requests
        });

        Self {
            addr,
            handle: Some(handle),
        }
    }

    /// Wait for the responder thread and return the requests it received
    pub fn join(mut self) -> Vec<String> {
        self.handle
            .take()
            .map(|h| h.join().expect("responder thread panicked"))
            .unwrap_or_default()
    }
}

/// A bound UDP socket that never answers; keep it alive for the test's duration
pub fn silent_target() -> (UdpSocket, SocketAddrV4) {
    let socket = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).expect("bind silent target");
    let addr = match socket.local_addr().expect("silent target addr") {
        SocketAddr::V4(addr) => addr,
        SocketAddr::V6(_) => unreachable!("bound to an IPv4 address"),
    };
    (socket, addr)
}
