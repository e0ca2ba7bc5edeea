//! The server-side device directory.

use crate::error::ServerResult;
use crate::store::DeviceStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use warden_types::{DeviceIdentity, HardwareId};

/// Outcome of presenting an identity to the directory.
#[derive(Debug, Clone)]
pub enum Recognition {
    /// The hardware id was already on record; carries the stored record.
    Known(DeviceIdentity),
    /// First contact; carries the newly stored record.
    Provisioned(DeviceIdentity),
}

impl Recognition {
    pub fn device(&self) -> &DeviceIdentity {
        match self {
            Recognition::Known(device) | Recognition::Provisioned(device) => device,
        }
    }

    pub fn into_device(self) -> DeviceIdentity {
        match self {
            Recognition::Known(device) | Recognition::Provisioned(device) => device,
        }
    }

    pub fn is_provisioned(&self) -> bool {
        matches!(self, Recognition::Provisioned(_))
    }
}

/// Every device the server has seen, keyed by hardware id.
///
/// A single lock guards the whole map. [`DeviceDirectory::recognize`] holds
/// it across lookup, persistence and insertion, so concurrent first contacts
/// with the same hardware id produce exactly one provisional record.
pub struct DeviceDirectory {
    devices: Mutex<HashMap<HardwareId, DeviceIdentity>>,
    store: Arc<dyn DeviceStore>,
}

impl DeviceDirectory {
    /// Creates a directory over an already loaded device map.
    pub fn new(store: Arc<dyn DeviceStore>, devices: HashMap<HardwareId, DeviceIdentity>) -> Self {
        Self {
            devices: Mutex::new(devices),
            store,
        }
    }

    /// Creates a directory from the devices currently in `store`.
    pub async fn load(store: Arc<dyn DeviceStore>) -> ServerResult<Self> {
        let devices = store.load_devices().await?;
        debug!(count = devices.len(), "Loaded device directory");
        Ok(Self::new(store, devices))
    }

    /// Resolves `presented` against the directory.
    ///
    /// A known hardware id returns the stored record unchanged; the
    /// presented nickname and profile are ignored. An unknown one is stored
    /// with the presented nickname and no profile, persisted first, and only
    /// then admitted to the map.
    pub async fn recognize(&self, presented: &DeviceIdentity) -> ServerResult<Recognition> {
        let mut devices = self.devices.lock().await;

        if let Some(record) = devices.get(presented.key()) {
            info!(
                event = "device-recognized",
                hardware_id = %record.key(),
                nickname = %record.nickname,
                profile = %record.profile,
                "Device recognized"
            );
            return Ok(Recognition::Known(record.clone()));
        }

        let record = DeviceIdentity::new(presented.hardware_id.clone(), presented.nickname.clone());
        self.store.upsert_device(&record).await?;
        devices.insert(record.key().clone(), record.clone());

        info!(
            event = "device-provisioned",
            hardware_id = %record.key(),
            nickname = %record.nickname,
            "Device provisioned"
        );
        Ok(Recognition::Provisioned(record))
    }

    pub async fn get(&self, hardware_id: &HardwareId) -> Option<DeviceIdentity> {
        self.devices.lock().await.get(hardware_id).cloned()
    }

    /// Inserts or replaces a record, e.g. to assign a profile. Returns the
    /// previous record.
    pub async fn upsert(&self, device: DeviceIdentity) -> ServerResult<Option<DeviceIdentity>> {
        let mut devices = self.devices.lock().await;
        self.store.upsert_device(&device).await?;
        debug!(hardware_id = %device.key(), profile = %device.profile, "Device record updated");
        Ok(devices.insert(device.key().clone(), device))
    }

    pub async fn len(&self) -> usize {
        self.devices.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.devices.lock().await.is_empty()
    }

    /// All records, ordered by hardware id.
    pub async fn snapshot(&self) -> Vec<DeviceIdentity> {
        let mut devices: Vec<_> = self.devices.lock().await.values().cloned().collect();
        devices.sort_by(|a, b| a.key().cmp(b.key()));
        devices
    }
}
