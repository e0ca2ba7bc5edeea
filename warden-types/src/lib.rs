//! Core type definitions for Warden.
//!
//! This crate defines the identity and permission model shared by the
//! server and the client:
//! - Device identities keyed by a hardware fingerprint
//! - Profiles with permission flags, group membership and a device allowlist
//! - The JSON configuration helper used by both binaries
//!
//! Identity equality is by key only: two [`DeviceIdentity`] values describe
//! the same device iff their [`DeviceIdentity::key`] is equal.

mod config;
mod device;
mod ids;
mod profile;

pub use config::JsonConfig;
pub use device::DeviceIdentity;
pub use ids::{HardwareId, ProfileId};
pub use profile::{GroupSet, Permissions, Profile, MAX_GROUPS};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid group id {0}: must be between 0 and 63 (inclusive)")]
    InvalidGroupId(i32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
