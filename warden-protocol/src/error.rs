//! Error types for the protocol layer.

use crate::packet::PacketKind;
use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while registering, encoding or decoding packets.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The discriminator does not name a registered packet.
    #[error("unknown packet type: {0}")]
    UnknownPacketType(u64),

    /// The payload is not a valid packet of the resolved type.
    #[error("malformed packet: {0}")]
    MalformedPacket(String),

    /// Two declarations claim the same id.
    #[error("packet id {id} is claimed by both {first:?} and {second:?}")]
    DuplicatePacketId {
        id: u32,
        first: PacketKind,
        second: PacketKind,
    },

    /// One variant is declared under two ids.
    #[error("packet variant {kind:?} is declared under both id {first} and id {second}")]
    DuplicatePacketKind {
        kind: PacketKind,
        first: u32,
        second: u32,
    },

    /// A packet variant has no id.
    #[error("packet variant {0:?} has no id")]
    MissingPacketId(PacketKind),

    /// A frame exceeds the size limit.
    #[error("frame too large: {0} bytes")]
    FrameTooLarge(usize),

    /// Stream error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
