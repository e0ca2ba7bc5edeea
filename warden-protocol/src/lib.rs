//! Packet registry and wire codec for Warden.
//!
//! # Packets
//!
//! The set of packets is closed: [`Packet`] is an enum with one variant per
//! message shape, and every variant declares a numeric id through
//! [`PacketKind::declared_id`]. A [`PacketRegistry`] is built once at
//! startup from those declarations and refuses to build if two variants
//! claim the same id.
//!
//! # Wire form
//!
//! A packet is a JSON object with a numeric `id` discriminator next to the
//! variant's own fields:
//!
//! ```json
//! {"id":0,"status":"ok","note":"","correlation_id":1}
//! ```
//!
//! On a stream, each packet travels as a frame: a 4-byte big-endian length
//! followed by the JSON bytes (see [`codec`]).

pub mod codec;
mod error;
mod packet;
mod registry;

pub use codec::{read_frame, read_packet, write_frame, write_packet, MAX_FRAME_SIZE};
pub use error::{ProtocolError, ProtocolResult};
pub use packet::{IdentityMessage, Packet, PacketKind, Status, StatusMessage};
pub use registry::{PacketId, PacketRegistry};
