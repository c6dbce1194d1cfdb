//! Simple camera discovery that outputs JSON for scripting
//!
//! Usage: cargo run -p camera-remote-discovery --example discover_json [timeout_secs]

use camera_discovery::{get_with_config, DiscoveryConfig};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let timeout = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(5);

    let devices = get_with_config(DiscoveryConfig::new().with_timeout(Duration::from_secs(timeout)));

    match serde_json::to_string_pretty(&devices) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize devices: {}", e),
    }
}
