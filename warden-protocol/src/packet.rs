//! Packet variants.

use serde::{Deserialize, Serialize};
use warden_types::DeviceIdentity;

/// Outcome carried by a [`StatusMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    NotOk,
}

/// Acknowledgement or status report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub status: Status,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub correlation_id: u64,
}

impl StatusMessage {
    pub fn ok(correlation_id: u64) -> Self {
        Self {
            status: Status::Ok,
            note: String::new(),
            correlation_id,
        }
    }

    pub fn not_ok(note: impl Into<String>, correlation_id: u64) -> Self {
        Self {
            status: Status::NotOk,
            note: note.into(),
            correlation_id,
        }
    }
}

/// A device presenting (or being told) its identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityMessage {
    pub device: DeviceIdentity,
}

impl IdentityMessage {
    pub fn new(device: DeviceIdentity) -> Self {
        Self { device }
    }
}

/// Every message that can cross the wire.
#[derive(Debug, Clone)]
pub enum Packet {
    Status(StatusMessage),
    Identity(IdentityMessage),
}

impl Packet {
    /// The variant of this packet.
    pub fn kind(&self) -> PacketKind {
        match self {
            Packet::Status(_) => PacketKind::Status,
            Packet::Identity(_) => PacketKind::Identity,
        }
    }
}

impl From<StatusMessage> for Packet {
    fn from(message: StatusMessage) -> Self {
        Packet::Status(message)
    }
}

impl From<IdentityMessage> for Packet {
    fn from(message: IdentityMessage) -> Self {
        Packet::Identity(message)
    }
}

/// Field-less mirror of [`Packet`], used as the registry's value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketKind {
    Status,
    Identity,
}

impl PacketKind {
    /// Every packet variant. A registry must declare each of these exactly
    /// once.
    pub const ALL: [PacketKind; 2] = [PacketKind::Status, PacketKind::Identity];

    /// The wire id this variant is declared with.
    pub const fn declared_id(self) -> u32 {
        match self {
            PacketKind::Status => 0,
            PacketKind::Identity => 1,
        }
    }
}
