//! Profiles: permission flags, group membership and known devices.
//!
//! Profiles are administered outside the server (they live in the server
//! configuration file) and are only read here. A device linked to a profile
//! may act on that profile's behalf once [`Profile::is_associated`] confirms
//! the device is on the profile's allowlist.

use crate::device::DeviceIdentity;
use crate::ids::{HardwareId, ProfileId};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Number of addressable groups in a [`GroupSet`].
pub const MAX_GROUPS: i32 = 64;

/// Independent capability flags, combinable with `|`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(u32);

impl Permissions {
    pub const NONE: Permissions = Permissions(0);
    pub const RECEIVE: Permissions = Permissions(1 << 0);
    pub const PING: Permissions = Permissions(1 << 1);
    pub const PING_ALL: Permissions = Permissions(1 << 2);
    pub const REQUEST_STATUS: Permissions = Permissions(1 << 3);
    pub const REQUEST_ACTIVITY: Permissions = Permissions(1 << 4);
    pub const SEND_AUDIO: Permissions = Permissions(1 << 5);

    const NAMED: [(Permissions, &'static str); 6] = [
        (Self::RECEIVE, "receive"),
        (Self::PING, "ping"),
        (Self::PING_ALL, "ping-all"),
        (Self::REQUEST_STATUS, "request-status"),
        (Self::REQUEST_ACTIVITY, "request-activity"),
        (Self::SEND_AUDIO, "send-audio"),
    ];

    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Bitwise AND test: true if any bit of `flag` is set in `self`.
    #[must_use]
    pub const fn intersects(self, flag: Permissions) -> bool {
        self.0 & flag.0 != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Permissions {
    type Output = Permissions;

    fn bitor(self, rhs: Self) -> Self::Output {
        Permissions(self.0 | rhs.0)
    }
}

impl BitOrAssign for Permissions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Permissions {
    type Output = Permissions;

    fn bitand(self, rhs: Self) -> Self::Output {
        Permissions(self.0 & rhs.0)
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        let mut rest = self.0;
        for (flag, name) in Self::NAMED {
            if self.intersects(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
                rest &= !flag.0;
            }
        }
        if rest != 0 {
            if !first {
                f.write_str("|")?;
            }
            write!(f, "{rest:#x}")?;
        }
        Ok(())
    }
}

/// Membership in up to 64 groups, one bit per group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupSet(u64);

impl GroupSet {
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Tests membership in group `index`.
    ///
    /// # Errors
    /// [`Error::InvalidGroupId`] if `index` is outside `0..64`.
    pub fn contains(self, index: i32) -> Result<bool> {
        let bit = Self::bit(index)?;
        Ok(self.0 & bit != 0)
    }

    /// Adds group `index` to the set.
    pub fn insert(&mut self, index: i32) -> Result<()> {
        self.0 |= Self::bit(index)?;
        Ok(())
    }

    /// Removes group `index` from the set.
    pub fn remove(&mut self, index: i32) -> Result<()> {
        self.0 &= !Self::bit(index)?;
        Ok(())
    }

    fn bit(index: i32) -> Result<u64> {
        if !(0..MAX_GROUPS).contains(&index) {
            return Err(Error::InvalidGroupId(index));
        }
        Ok(1u64 << index)
    }
}

/// A named set of permissions and groups shared by a list of known devices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    id: ProfileId,
    name: String,
    #[serde(default)]
    permissions: Permissions,
    #[serde(default)]
    groups: GroupSet,
    #[serde(default)]
    known_devices: Vec<HardwareId>,
}

impl Profile {
    /// Creates an empty profile with no permissions, groups or devices.
    pub fn new(id: ProfileId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            permissions: Permissions::NONE,
            groups: GroupSet::default(),
            known_devices: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    /// Adds the profile to group `index`.
    pub fn with_group(mut self, index: i32) -> Result<Self> {
        self.groups.insert(index)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_known_device(mut self, hardware_id: HardwareId) -> Self {
        if !self.known_devices.contains(&hardware_id) {
            self.known_devices.push(hardware_id);
        }
        self
    }

    pub fn id(&self) -> ProfileId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    pub fn groups(&self) -> GroupSet {
        self.groups
    }

    pub fn known_devices(&self) -> &[HardwareId] {
        &self.known_devices
    }

    /// Bitwise AND of the profile's flags against `flag`.
    pub fn has_permission(&self, flag: Permissions) -> bool {
        self.permissions.intersects(flag)
    }

    /// Whether the profile belongs to group `index`.
    ///
    /// # Errors
    /// [`Error::InvalidGroupId`] if `index` is outside `0..64`.
    pub fn is_in_group(&self, index: i32) -> Result<bool> {
        self.groups.contains(index)
    }

    /// Whether `device` is on this profile's allowlist.
    pub fn is_associated(&self, device: &DeviceIdentity) -> bool {
        self.known_devices.iter().any(|known| known == device.key())
    }
}
