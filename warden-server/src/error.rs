//! Error types for the server.

use std::fmt;
use thiserror::Error;
use warden_protocol::ProtocolError;
use warden_types::{HardwareId, Permissions, ProfileId};

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur while serving devices.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Identity model error (e.g. an invalid group index).
    #[error(transparent)]
    Types(#[from] warden_types::Error),

    /// Packet encoding or framing error.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The device store could not persist or load records.
    #[error("storage error: {0}")]
    Storage(String),

    /// The authorization gate refused a request.
    #[error("access denied: {0}")]
    AccessDenied(Denial),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// No live connection is registered for the device.
    #[error("device not connected: {0}")]
    NotConnected(HardwareId),

    /// The connection's outbound queue has shut down.
    #[error("channel closed")]
    ChannelClosed,

    /// Socket error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why the authorization gate refused a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// The device has not been linked to a profile.
    Unassigned(HardwareId),
    /// The device references a profile that does not exist.
    UnknownProfile(ProfileId),
    /// The device is not on its profile's allowlist.
    NotAssociated {
        device: HardwareId,
        profile: ProfileId,
    },
    /// The profile lacks the requested permission.
    MissingPermission {
        profile: ProfileId,
        permission: Permissions,
    },
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::Unassigned(device) => write!(f, "device {device} has no profile"),
            Denial::UnknownProfile(profile) => write!(f, "profile {profile} does not exist"),
            Denial::NotAssociated { device, profile } => {
                write!(f, "device {device} is not a known device of profile {profile}")
            }
            Denial::MissingPermission {
                profile,
                permission,
            } => write!(f, "profile {profile} lacks permission {permission}"),
        }
    }
}

impl From<Denial> for ServerError {
    fn from(denial: Denial) -> Self {
        ServerError::AccessDenied(denial)
    }
}
