//! Persistence for device and profile records.
//!
//! The directory only needs get/upsert semantics from its backing store, so
//! the store is a small async trait with a JSON-file implementation for the
//! binary and an in-memory one for tests and embedding.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use warden_types::{DeviceIdentity, HardwareId, JsonConfig, Profile, ProfileId};

/// Supplies and persists the device and profile maps.
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// Every stored device, keyed by hardware id.
    async fn load_devices(&self) -> ServerResult<HashMap<HardwareId, DeviceIdentity>>;

    /// Every administered profile, keyed by profile id.
    async fn load_profiles(&self) -> ServerResult<HashMap<ProfileId, Profile>>;

    /// Inserts or replaces the record for `device.key()`.
    async fn upsert_device(&self, device: &DeviceIdentity) -> ServerResult<()>;
}

/// A [`DeviceStore`] backed by the server's JSON configuration file.
///
/// Every upsert rewrites the whole file.
pub struct JsonConfigStore {
    path: PathBuf,
    config: Mutex<ServerConfig>,
}

impl JsonConfigStore {
    /// Opens the configuration at `path`, creating it with defaults if it
    /// does not exist.
    pub fn open(path: impl Into<PathBuf>) -> ServerResult<Self> {
        let path = path.into();
        let config = ServerConfig::load_or_create(&path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Ok(Self {
            path,
            config: Mutex::new(config),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A copy of the configuration as currently held in memory.
    pub async fn config(&self) -> ServerConfig {
        self.config.lock().await.clone()
    }
}

#[async_trait]
impl DeviceStore for JsonConfigStore {
    async fn load_devices(&self) -> ServerResult<HashMap<HardwareId, DeviceIdentity>> {
        let config = self.config.lock().await;
        let mut devices = HashMap::with_capacity(config.devices.len());
        for (key, device) in &config.devices {
            if key != device.key() {
                return Err(ServerError::Config(format!(
                    "device entry {key} holds the record of {}",
                    device.key()
                )));
            }
            devices.insert(key.clone(), device.clone());
        }
        Ok(devices)
    }

    async fn load_profiles(&self) -> ServerResult<HashMap<ProfileId, Profile>> {
        let config = self.config.lock().await;
        let mut profiles = HashMap::with_capacity(config.profiles.len());
        for (&key, profile) in &config.profiles {
            if key != profile.id() {
                return Err(ServerError::Config(format!(
                    "profile entry {key} holds profile {}",
                    profile.id()
                )));
            }
            profiles.insert(key, profile.clone());
        }
        Ok(profiles)
    }

    async fn upsert_device(&self, device: &DeviceIdentity) -> ServerResult<()> {
        let mut config = self.config.lock().await;
        let previous = config.devices.insert(device.key().clone(), device.clone());

        // The lock stays held until the write lands so saves never reorder.
        let snapshot = config.clone();
        let path = self.path.clone();
        let saved = tokio::task::spawn_blocking(move || snapshot.save(&path))
            .await
            .map_err(|e| e.to_string())
            .and_then(|result| result.map_err(|e| e.to_string()));

        if let Err(e) = saved {
            match previous {
                Some(previous) => config.devices.insert(device.key().clone(), previous),
                None => config.devices.remove(device.key()),
            };
            return Err(ServerError::Storage(format!(
                "failed to write {}: {e}",
                self.path.display()
            )));
        }
        Ok(())
    }
}

/// A [`DeviceStore`] that keeps everything in memory.
#[derive(Default)]
pub struct MemoryStore {
    devices: Mutex<HashMap<HardwareId, DeviceIdentity>>,
    profiles: HashMap<ProfileId, Profile>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an administered profile.
    #[must_use]
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profiles.insert(profile.id(), profile);
        self
    }

    /// Seeds a stored device record.
    #[must_use]
    pub fn with_device(mut self, device: DeviceIdentity) -> Self {
        self.devices
            .get_mut()
            .insert(device.key().clone(), device);
        self
    }

    /// The stored record for `hardware_id`.
    pub async fn device(&self, hardware_id: &HardwareId) -> Option<DeviceIdentity> {
        self.devices.lock().await.get(hardware_id).cloned()
    }

    /// Number of stored devices.
    pub async fn device_count(&self) -> usize {
        self.devices.lock().await.len()
    }
}

#[async_trait]
impl DeviceStore for MemoryStore {
    async fn load_devices(&self) -> ServerResult<HashMap<HardwareId, DeviceIdentity>> {
        Ok(self.devices.lock().await.clone())
    }

    async fn load_profiles(&self) -> ServerResult<HashMap<ProfileId, Profile>> {
        Ok(self.profiles.clone())
    }

    async fn upsert_device(&self, device: &DeviceIdentity) -> ServerResult<()> {
        self.devices
            .lock()
            .await
            .insert(device.key().clone(), device.clone());
        Ok(())
    }
}
