//! Test helpers: a loopback SSDP responder and description documents

#![allow(dead_code)]

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Description document declaring `services` under `action_list_url`
pub fn description(name: &str, action_list_url: &str, services: &[&str]) -> String {
    let entries: String = services
        .iter()
        .map(|service| {
            format!(
                "<av:X_ScalarWebAPI_Service>\
                 <av:X_ScalarWebAPI_ServiceType>{}</av:X_ScalarWebAPI_ServiceType>\
                 <av:X_ScalarWebAPI_ActionList_URL>{}</av:X_ScalarWebAPI_ActionList_URL>\
                 </av:X_ScalarWebAPI_Service>",
                service, action_list_url
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0"?>
<root xmlns="urn:schemas-upnp-org:device-1-0" xmlns:av="urn:schemas-sony-com:av">
  <device>
    <friendlyName>{}</friendlyName>
    <av:X_ScalarWebAPI_DeviceInfo>
      <av:X_ScalarWebAPI_ServiceList>{}</av:X_ScalarWebAPI_ServiceList>
    </av:X_ScalarWebAPI_DeviceInfo>
  </device>
</root>"#,
        name, entries
    )
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
         \r\n",
        location
    )
}

/// Answers one M-SEARCH on 127.0.0.1 with `reply`
pub struct SsdpResponder {
    pub addr: SocketAddrV4,
    handle: JoinHandle<()>,
}

impl SsdpResponder {
    pub fn spawn(reply: String) -> Self {
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
            if let Ok((_, from)) = socket.recv_from(&mut buffer) {
                socket.send_to(reply.as_bytes(), from).expect("send reply");
            }
        });

        Self { addr, handle }
    }

    pub fn join(self) {
        self.handle.join().expect("responder thread panicked");
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
