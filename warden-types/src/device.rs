//! Device identity records.

use crate::ids::{HardwareId, ProfileId};
use serde::{Deserialize, Serialize};

/// What a device says about itself, and what the server remembers about it.
///
/// Only `hardware_id` identifies the device. The nickname is for display and
/// the profile reference is assigned by an administrator. The type does not
/// implement `PartialEq`; compare devices through [`DeviceIdentity::key`] or
/// [`DeviceIdentity::same_device`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub hardware_id: HardwareId,
    pub nickname: String,
    #[serde(default)]
    pub profile: ProfileId,
}

impl DeviceIdentity {
    /// Creates an identity with no profile assigned.
    pub fn new(hardware_id: HardwareId, nickname: impl Into<String>) -> Self {
        Self {
            hardware_id,
            nickname: nickname.into(),
            profile: ProfileId::UNASSIGNED,
        }
    }

    /// Sets the profile reference.
    #[must_use]
    pub fn with_profile(mut self, profile: ProfileId) -> Self {
        self.profile = profile;
        self
    }

    /// The identity key. Use this for comparison, hashing and map lookups.
    pub fn key(&self) -> &HardwareId {
        &self.hardware_id
    }

    /// Whether both records describe the same physical device.
    pub fn same_device(&self, other: &DeviceIdentity) -> bool {
        self.key() == other.key()
    }

    /// Whether an administrator has linked this device to a profile.
    pub fn is_assigned(&self) -> bool {
        !self.profile.is_unassigned()
    }
}
