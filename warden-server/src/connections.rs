//! Directory of live device connections.

use crate::error::{ServerError, ServerResult};
use std::collections::HashMap;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;
use uuid::Uuid;
use warden_protocol::Packet;
use warden_types::HardwareId;

/// Outbound side of one connection.
///
/// Packets sent through the handle are written to the socket by the
/// connection's writer task, in order.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: Uuid,
    outbound: mpsc::Sender<Packet>,
}

impl ConnectionHandle {
    /// Creates a handle with a fresh connection id.
    pub fn new(outbound: mpsc::Sender<Packet>) -> Self {
        Self {
            id: Uuid::new_v4(),
            outbound,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Queues `packet` for the connection.
    pub async fn send(&self, packet: Packet) -> ServerResult<()> {
        self.outbound
            .send(packet)
            .await
            .map_err(|_| ServerError::ChannelClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.outbound.is_closed()
    }
}

/// Live connections keyed by the hardware id the device identified as.
///
/// A device has at most one registered connection; a reconnect replaces
/// the previous entry.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<HardwareId, ConnectionHandle>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handle` for `hardware_id`, returning the handle it
    /// replaces.
    pub async fn register(
        &self,
        hardware_id: HardwareId,
        handle: ConnectionHandle,
    ) -> Option<ConnectionHandle> {
        debug!(%hardware_id, connection = %handle.id(), "Connection registered");
        self.connections.write().await.insert(hardware_id, handle)
    }

    /// Removes the entry for `hardware_id` if it still belongs to
    /// `connection_id`. A connection that has since been replaced leaves the
    /// newer entry alone.
    pub async fn unregister(&self, hardware_id: &HardwareId, connection_id: Uuid) -> bool {
        let mut connections = self.connections.write().await;
        match connections.get(hardware_id) {
            Some(handle) if handle.id() == connection_id => {
                connections.remove(hardware_id);
                debug!(%hardware_id, connection = %connection_id, "Connection unregistered");
                true
            }
            _ => false,
        }
    }

    /// The id of the connection registered for `hardware_id`.
    pub async fn connection_id(&self, hardware_id: &HardwareId) -> Option<Uuid> {
        self.connections
            .read()
            .await
            .get(hardware_id)
            .map(ConnectionHandle::id)
    }

    pub async fn contains(&self, hardware_id: &HardwareId) -> bool {
        self.connections.read().await.contains_key(hardware_id)
    }

    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }

    /// Queues `packet` for the device's registered connection.
    pub async fn send_to(&self, hardware_id: &HardwareId, packet: Packet) -> ServerResult<()> {
        let handle = self
            .connections
            .read()
            .await
            .get(hardware_id)
            .cloned()
            .ok_or_else(|| ServerError::NotConnected(hardware_id.clone()))?;
        handle.send(packet).await
    }
}
