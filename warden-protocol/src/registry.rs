//! Bidirectional packet id ↔ variant registry.

use crate::error::{ProtocolError, ProtocolResult};
use crate::packet::{Packet, PacketKind};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

/// Numeric packet discriminator.
pub type PacketId = u32;

/// Name of the discriminator field in the wire form.
const DISCRIMINATOR: &str = "id";

/// Maps packet ids to variants and back.
///
/// Built once, then only read; share it behind an `Arc` across connection
/// handlers without further locking.
#[derive(Debug, Clone)]
pub struct PacketRegistry {
    kinds: HashMap<PacketId, PacketKind>,
    ids: HashMap<PacketKind, PacketId>,
}

impl PacketRegistry {
    /// Builds the registry from each variant's declared id.
    pub fn standard() -> ProtocolResult<Self> {
        Self::from_declarations(PacketKind::ALL.map(|kind| (kind.declared_id(), kind)))
    }

    /// Builds a registry from explicit `(id, variant)` declarations.
    ///
    /// # Errors
    /// - [`ProtocolError::DuplicatePacketId`] if two declarations share an id.
    /// - [`ProtocolError::DuplicatePacketKind`] if a variant is declared twice.
    /// - [`ProtocolError::MissingPacketId`] if a variant is not declared.
    pub fn from_declarations(
        declarations: impl IntoIterator<Item = (PacketId, PacketKind)>,
    ) -> ProtocolResult<Self> {
        let mut kinds = HashMap::new();
        let mut ids = HashMap::new();

        for (id, kind) in declarations {
            if let Some(&first) = kinds.get(&id) {
                return Err(ProtocolError::DuplicatePacketId {
                    id,
                    first,
                    second: kind,
                });
            }
            if let Some(&first) = ids.get(&kind) {
                return Err(ProtocolError::DuplicatePacketKind {
                    kind,
                    first,
                    second: id,
                });
            }
            kinds.insert(id, kind);
            ids.insert(kind, id);
        }

        if let Some(kind) = PacketKind::ALL.into_iter().find(|kind| !ids.contains_key(kind)) {
            return Err(ProtocolError::MissingPacketId(kind));
        }

        Ok(Self { kinds, ids })
    }

    /// The id registered for `kind`.
    pub fn id_of(&self, kind: PacketKind) -> Option<PacketId> {
        self.ids.get(&kind).copied()
    }

    /// The variant registered under `id`.
    pub fn kind_of(&self, id: PacketId) -> Option<PacketKind> {
        self.kinds.get(&id).copied()
    }

    /// Number of registered variants.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Encodes `packet` as JSON stamped with its registered id.
    pub fn serialize(&self, packet: &Packet) -> ProtocolResult<String> {
        let kind = packet.kind();
        let id = self
            .id_of(kind)
            .ok_or(ProtocolError::MissingPacketId(kind))?;

        let body = match packet {
            Packet::Status(message) => serde_json::to_value(message),
            Packet::Identity(message) => serde_json::to_value(message),
        }
        .map_err(|e| ProtocolError::MalformedPacket(e.to_string()))?;

        let Value::Object(mut fields) = body else {
            return Err(ProtocolError::MalformedPacket(format!(
                "{kind:?} does not encode as a JSON object"
            )));
        };
        fields.insert(DISCRIMINATOR.to_string(), Value::from(id));

        serde_json::to_string(&Value::Object(fields))
            .map_err(|e| ProtocolError::MalformedPacket(e.to_string()))
    }

    /// Decodes a packet, resolving its variant from the `id` field.
    ///
    /// # Errors
    /// - [`ProtocolError::UnknownPacketType`] if the id is not registered.
    /// - [`ProtocolError::MalformedPacket`] if the payload is not a JSON
    ///   object, lacks a numeric id, or does not decode as the resolved
    ///   variant.
    pub fn deserialize(&self, data: impl AsRef<[u8]>) -> ProtocolResult<Packet> {
        let value: Value = serde_json::from_slice(data.as_ref())
            .map_err(|e| ProtocolError::MalformedPacket(format!("invalid JSON: {e}")))?;
        let Value::Object(mut fields) = value else {
            return Err(ProtocolError::MalformedPacket(
                "packet is not a JSON object".to_string(),
            ));
        };

        let discriminator = fields.remove(DISCRIMINATOR).ok_or_else(|| {
            ProtocolError::MalformedPacket("missing packet id".to_string())
        })?;
        let raw_id = discriminator.as_u64().ok_or_else(|| {
            ProtocolError::MalformedPacket(format!(
                "packet id is not an unsigned integer: {discriminator}"
            ))
        })?;
        let kind = PacketId::try_from(raw_id)
            .ok()
            .and_then(|id| self.kind_of(id))
            .ok_or(ProtocolError::UnknownPacketType(raw_id))?;

        let body = Value::Object(fields);
        let packet = match kind {
            PacketKind::Status => Packet::Status(decode_body(body, kind)?),
            PacketKind::Identity => Packet::Identity(decode_body(body, kind)?),
        };
        Ok(packet)
    }
}

fn decode_body<T: DeserializeOwned>(body: Value, kind: PacketKind) -> ProtocolResult<T> {
    serde_json::from_value(body)
        .map_err(|e| ProtocolError::MalformedPacket(format!("{kind:?} packet: {e}")))
}
