//! Per-connection recognition state machine.

use crate::connections::ConnectionHandle;
use crate::directory::Recognition;
use crate::error::ServerResult;
use crate::server::ServerState;
use std::sync::Arc;
use tracing::{debug, warn};
use warden_protocol::{IdentityMessage, Packet, StatusMessage};
use warden_types::HardwareId;

/// Correlation id of the acknowledgement sent to a newly provisioned device.
pub const PROVISIONED_CORRELATION_ID: u64 = 1;

/// Note carried by the refusal of a second identity packet.
pub const ALREADY_IDENTIFIED: &str = "already identified";

/// Where a connection stands in the identify exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No identity received yet.
    Unregistered,
    /// The device was on record and has been sent its stored identity.
    Recognized(HardwareId),
    /// The device was stored on first contact and acknowledged.
    Provisional(HardwareId),
}

impl SessionState {
    /// The hardware id the connection identified as, once terminal.
    pub fn hardware_id(&self) -> Option<&HardwareId> {
        match self {
            SessionState::Unregistered => None,
            SessionState::Recognized(id) | SessionState::Provisional(id) => Some(id),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionState::Unregistered)
    }
}

/// One connection's view of the server.
pub struct Session {
    state: SessionState,
    connection: ConnectionHandle,
    server: Arc<ServerState>,
}

impl Session {
    pub fn new(server: Arc<ServerState>, connection: ConnectionHandle) -> Self {
        Self {
            state: SessionState::Unregistered,
            connection,
            server,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn connection(&self) -> &ConnectionHandle {
        &self.connection
    }

    /// Handles one inbound packet and returns the reply, if any.
    pub async fn handle(&mut self, packet: Packet) -> ServerResult<Option<Packet>> {
        match packet {
            Packet::Identity(message) => self.identify(message).await.map(Some),
            Packet::Status(message) => {
                debug!(
                    connection = %self.connection.id(),
                    status = ?message.status,
                    correlation_id = message.correlation_id,
                    "Ignoring status packet from device"
                );
                Ok(None)
            }
        }
    }

    async fn identify(&mut self, message: IdentityMessage) -> ServerResult<Packet> {
        if self.state.is_terminal() {
            warn!(
                connection = %self.connection.id(),
                presented = %message.device.key(),
                "Identity packet after identification"
            );
            return Ok(StatusMessage::not_ok(ALREADY_IDENTIFIED, 0).into());
        }

        let recognition = self.server.devices().recognize(&message.device).await?;
        let hardware_id = recognition.device().key().clone();

        if let Some(previous) = self
            .server
            .connections()
            .register(hardware_id.clone(), self.connection.clone())
            .await
        {
            debug!(
                %hardware_id,
                replaced = %previous.id(),
                "Replaced earlier connection for device"
            );
        }

        let reply = match recognition {
            Recognition::Known(record) => {
                self.state = SessionState::Recognized(hardware_id);
                IdentityMessage::new(record).into()
            }
            Recognition::Provisioned(_) => {
                self.state = SessionState::Provisional(hardware_id);
                StatusMessage::ok(PROVISIONED_CORRELATION_ID).into()
            }
        };
        Ok(reply)
    }

    /// Removes this connection from the connection registry, unless a newer
    /// connection has taken its place.
    pub async fn close(&self) {
        if let Some(hardware_id) = self.state.hardware_id() {
            self.server
                .connections()
                .unregister(hardware_id, self.connection.id())
                .await;
        }
    }
}
