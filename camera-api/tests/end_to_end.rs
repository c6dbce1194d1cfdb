//! End-to-end tests: SSDP discovery, description fetch, binding and RPC
//!
//! A loopback UDP responder answers the M-SEARCH and a mock HTTP server plays
//! both the description host and the camera's RPC endpoints.

mod helpers;

use camera_api::{discover, CameraClient, CameraError};
use camera_discovery::{CancelToken, DiscoveryConfig, DiscoveryError, ServiceBinding};
use helpers::{description, silent_target, ssdp_reply, SsdpResponder};
use mockito::{Matcher, Server};
use rpc_client::RpcError;
use serde_json::json;
use std::time::Duration;

#[test]
fn test_discover_then_get_event() {
    let mut server = Server::new();
    let action_list_url = format!("{}/sony", server.url());
    let description_mock = server
        .mock("GET", "/dd.xml")
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(description("ILCE-6000", &action_list_url, &["camera"]))
        .create();
    let rpc_mock = server
        .mock("POST", "/sony/camera")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(
            json!({"method": "getEvent", "params": [], "id": 1, "version": "1.0"}),
        ))
        .with_status(200)
        .with_body(r#"{"result":[{"cameraStatus":"IDLE"}],"id":1}"#)
        .create();

    let responder = SsdpResponder::spawn(ssdp_reply(&format!("{}/dd.xml", server.url())));
    let config = DiscoveryConfig::new()
        .with_target(responder.addr)
        .with_timeout(Duration::from_secs(2));

    let client = discover(&config).unwrap();
    responder.join();
    description_mock.assert();

    let expected: ServiceBinding = [(
        "camera".to_string(),
        format!("{}/sony/camera", server.url()),
    )]
    .into_iter()
    .collect();
    assert_eq!(client.binding(), &expected);
    assert_eq!(
        client.info().and_then(|info| info.friendly_name.as_deref()),
        Some("ILCE-6000")
    );

    let result = client.invoke("camera", "getEvent", vec![]).unwrap();
    rpc_mock.assert();
    assert_eq!(result, vec![json!({"cameraStatus": "IDLE"})]);
}

#[test]
fn test_named_operation_over_http() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/sony/camera")
        .match_body(Matcher::Json(
            json!({"method": "getVersions", "params": [], "id": 1, "version": "1.0"}),
        ))
        .with_status(200)
        .with_body(r#"{"result":[["1.0","1.1","1.2"]],"id":1}"#)
        .create();

    let binding = ServiceBinding::from_xml(&description(
        "DSC-QX10",
        &format!("{}/sony", server.url()),
        &["guide", "camera"],
    ))
    .unwrap();
    let client = CameraClient::new(binding);

    assert_eq!(client.get_versions().unwrap(), vec![json!(["1.0", "1.1", "1.2"])]);
    mock.assert();
}

#[test]
fn test_discover_times_out_without_cameras() {
    let (_target, addr) = silent_target();
    let config = DiscoveryConfig::new()
        .with_target(addr)
        .with_timeout(Duration::from_millis(300));

    let err = discover(&config).unwrap_err();

    assert_eq!(err, CameraError::Discovery(DiscoveryError::Timeout));
    assert!(err.is_recoverable());
}

#[test]
fn test_discover_reports_description_fetch_failure() {
    let mut server = Server::new();
    let _mock = server.mock("GET", "/dd.xml").with_status(404).create();

    let location = format!("{}/dd.xml", server.url());
    let responder = SsdpResponder::spawn(ssdp_reply(&location));
    let config = DiscoveryConfig::new()
        .with_target(responder.addr)
        .with_timeout(Duration::from_secs(2));

    let err = discover(&config).unwrap_err();
    responder.join();

    assert_eq!(
        err,
        CameraError::Discovery(DiscoveryError::Fetch {
            status: 404,
            url: location
        })
    );
}

#[test]
fn test_binding_from_description_without_network() {
    let xml = description("ILCE-6000", "http://192.0.2.5:12345/sony", &["camera"]);
    let client = CameraClient::new(ServiceBinding::from_xml(&xml).unwrap());

    assert_eq!(
        client.require_camera().unwrap(),
        "http://192.0.2.5:12345/sony/camera"
    );
    assert_eq!(
        client.invoke("avContent", "getContentList", vec![]).unwrap_err(),
        RpcError::UnboundService("avContent".to_string())
    );
}

#[test]
fn test_rpc_error_status_is_reported() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/sony/camera")
        .with_status(503)
        .with_body("Service Unavailable")
        .create();

    let binding: ServiceBinding = [("camera".to_string(), format!("{}/sony/camera", server.url()))]
        .into_iter()
        .collect();
    let client = CameraClient::new(binding);

    assert_eq!(
        client.act_take_picture().unwrap_err(),
        RpcError::Transport {
            status: 503,
            body: "Service Unavailable".to_string()
        }
    );
}

#[test]
fn test_rpc_reply_without_result_is_protocol_error() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/sony/camera")
        .with_status(200)
        .with_body(r#"{"error":[40403,"Long shooting"],"id":1}"#)
        .create();

    let binding: ServiceBinding = [("camera".to_string(), format!("{}/sony/camera", server.url()))]
        .into_iter()
        .collect();
    let client = CameraClient::new(binding);

    assert!(matches!(
        client.act_take_picture(),
        Err(RpcError::Protocol(msg)) if msg.contains("40403")
    ));
}

#[test]
fn test_discovered_client_shares_cancel_token() {
    let mut server = Server::new();
    let _description = server
        .mock("GET", "/dd.xml")
        .with_status(200)
        .with_body(description("ILCE-6000", &format!("{}/sony", server.url()), &["camera"]))
        .create();
    let rpc_mock = server.mock("POST", "/sony/camera").expect(0).create();

    let responder = SsdpResponder::spawn(ssdp_reply(&format!("{}/dd.xml", server.url())));
    let token = CancelToken::new();
    let config = DiscoveryConfig::new()
        .with_target(responder.addr)
        .with_timeout(Duration::from_secs(2))
        .with_cancel_token(token.clone());

    let client = discover(&config).unwrap();
    responder.join();
    token.cancel();

    assert_eq!(client.get_event(false).unwrap_err(), RpcError::Cancelled);
    rpc_mock.assert();
}
