//! The device side of the identify exchange.

use crate::error::{ClientError, ClientResult};
use tokio::net::TcpStream;
use tracing::{debug, info};
use warden_crypto::device_fingerprint;
use warden_protocol::{
    read_packet, write_packet, IdentityMessage, Packet, PacketRegistry, Status,
};
use warden_types::DeviceIdentity;

/// Correlation id the server uses to acknowledge a first contact.
const PROVISIONED_CORRELATION_ID: u64 = 1;

/// This machine's identity: its fingerprint, the given nickname and no
/// profile.
pub fn local_identity(nickname: impl Into<String>) -> DeviceIdentity {
    DeviceIdentity::new(device_fingerprint(), nickname)
}

/// How the server answered an identity packet.
#[derive(Debug, Clone)]
pub enum IdentifyOutcome {
    /// First contact: the server stored the device with no profile.
    Provisional,
    /// The server already knew the device; carries its stored record.
    Recognized(DeviceIdentity),
}

/// A connection to a Warden server.
pub struct Client {
    stream: TcpStream,
    registry: PacketRegistry,
}

impl Client {
    /// Connects to the server at `address`.
    pub async fn connect(address: &str) -> ClientResult<Self> {
        let stream = TcpStream::connect(address).await?;
        debug!(%address, "Connected to server");
        Ok(Self {
            stream,
            registry: PacketRegistry::standard()?,
        })
    }

    /// Presents `device` and waits for the server's verdict.
    pub async fn identify(&mut self, device: &DeviceIdentity) -> ClientResult<IdentifyOutcome> {
        let packet: Packet = IdentityMessage::new(device.clone()).into();
        write_packet(&mut self.stream, &self.registry, &packet).await?;

        let reply = self.next_packet().await?.ok_or(ClientError::ConnectionClosed)?;
        let outcome = match reply {
            Packet::Status(message)
                if message.status == Status::Ok
                    && message.correlation_id == PROVISIONED_CORRELATION_ID =>
            {
                IdentifyOutcome::Provisional
            }
            Packet::Identity(message) if message.device.same_device(device) => {
                IdentifyOutcome::Recognized(message.device)
            }
            Packet::Identity(message) => {
                return Err(ClientError::UnexpectedReply(format!(
                    "identity of another device ({})",
                    message.device.key()
                )));
            }
            Packet::Status(message) => {
                return Err(ClientError::UnexpectedReply(format!(
                    "status {:?} ({}) with correlation id {}",
                    message.status, message.note, message.correlation_id
                )));
            }
        };

        match &outcome {
            IdentifyOutcome::Provisional => {
                info!(hardware_id = %device.key(), "Registered with server, awaiting profile")
            }
            IdentifyOutcome::Recognized(record) => {
                info!(hardware_id = %record.key(), profile = %record.profile, "Recognized by server")
            }
        }
        Ok(outcome)
    }

    /// Waits for the next packet from the server. `Ok(None)` means the
    /// server closed the connection.
    pub async fn next_packet(&mut self) -> ClientResult<Option<Packet>> {
        Ok(read_packet(&mut self.stream, &self.registry).await?)
    }
}
