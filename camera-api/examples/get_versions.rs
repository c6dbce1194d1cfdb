//! Discover a camera and print the API versions it supports
//!
//! Usage: RUST_LOG=debug cargo run -p camera-remote-api --example get_versions [timeout_secs]

use camera_api::discover;
use camera_discovery::DiscoveryConfig;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let timeout = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(5);
    let config = DiscoveryConfig::new().with_timeout(Duration::from_secs(timeout));

    let client = match discover(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("No camera found: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for (service, endpoint) in client.binding().iter() {
        println!("{:<10} {}", service, endpoint);
    }

    match client.get_versions() {
        Ok(versions) => {
            println!("getVersions: {}", serde_json::Value::Array(versions));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("getVersions failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
