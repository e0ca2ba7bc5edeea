//! Client configuration file.

use serde::{Deserialize, Serialize};
use warden_types::JsonConfig;

/// Default location of the client configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "warden-client.json";

/// Default server address.
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:7420";

/// Where to find the server and what to call this device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server_address: String,
    pub nickname: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            nickname: machine_hostname(),
        }
    }
}

impl JsonConfig for ClientConfig {}

/// Gets the machine hostname.
fn machine_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}
