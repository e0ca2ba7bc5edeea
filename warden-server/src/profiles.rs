//! Read-only profile directory and the authorization gate.

use crate::error::{Denial, ServerResult};
use crate::store::DeviceStore;
use std::collections::HashMap;
use tracing::debug;
use warden_types::{DeviceIdentity, Permissions, Profile, ProfileId};

/// Administered profiles, keyed by id.
///
/// Profiles are only referenced here, never created or modified.
#[derive(Debug, Clone, Default)]
pub struct ProfileDirectory {
    profiles: HashMap<ProfileId, Profile>,
}

impl ProfileDirectory {
    pub fn new(profiles: impl IntoIterator<Item = Profile>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|profile| (profile.id(), profile))
                .collect(),
        }
    }

    /// Loads the profiles currently in `store`.
    pub async fn load(store: &dyn DeviceStore) -> ServerResult<Self> {
        let profiles = store.load_profiles().await?;
        debug!(count = profiles.len(), "Loaded profiles");
        Ok(Self { profiles })
    }

    pub fn get(&self, id: ProfileId) -> Option<&Profile> {
        self.profiles.get(&id)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// The profile `device` may act for.
    ///
    /// The device must reference an existing profile and appear on that
    /// profile's allowlist.
    pub fn profile_for(&self, device: &DeviceIdentity) -> Result<&Profile, Denial> {
        if !device.is_assigned() {
            return Err(Denial::Unassigned(device.key().clone()));
        }
        let profile = self
            .profiles
            .get(&device.profile)
            .ok_or(Denial::UnknownProfile(device.profile))?;
        if !profile.is_associated(device) {
            return Err(Denial::NotAssociated {
                device: device.key().clone(),
                profile: device.profile,
            });
        }
        Ok(profile)
    }

    /// Checks that `device` may exercise `permission`.
    ///
    /// Callers must consult this before honouring a privileged request from
    /// a recognized device.
    pub fn authorize(&self, device: &DeviceIdentity, permission: Permissions) -> ServerResult<&Profile> {
        let profile = self.profile_for(device)?;
        if !profile.has_permission(permission) {
            return Err(Denial::MissingPermission {
                profile: profile.id(),
                permission,
            }
            .into());
        }
        Ok(profile)
    }

    /// Whether `device`'s profile belongs to group `index`.
    ///
    /// # Errors
    /// [`ServerError::AccessDenied`](crate::ServerError::AccessDenied) if the
    /// device is not associated with its profile, and
    /// [`ServerError::Types`](crate::ServerError::Types) if `index` is outside
    /// `0..64`.
    pub fn in_group(&self, device: &DeviceIdentity, index: i32) -> ServerResult<bool> {
        let profile = self.profile_for(device)?;
        Ok(profile.is_in_group(index)?)
    }
}
