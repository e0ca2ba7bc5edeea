//! Server configuration file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use warden_types::{DeviceIdentity, HardwareId, JsonConfig, Profile, ProfileId};

/// Default location of the server configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "warden-server.json";

/// Default TCP listen address.
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:7420";

/// Everything the server persists: where to listen, every device it has
/// seen and the administered profiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: String,
    pub devices: BTreeMap<HardwareId, DeviceIdentity>,
    pub profiles: BTreeMap<ProfileId, Profile>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
            devices: BTreeMap::new(),
            profiles: BTreeMap::new(),
        }
    }
}

impl JsonConfig for ServerConfig {}
