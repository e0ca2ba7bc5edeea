//! TCP accept loop and per-connection tasks.

use crate::connections::{ConnectionHandle, ConnectionRegistry};
use crate::directory::DeviceDirectory;
use crate::error::ServerResult;
use crate::profiles::ProfileDirectory;
use crate::session::Session;
use crate::store::DeviceStore;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use warden_protocol::{read_packet, write_packet, Packet, PacketRegistry};

/// Capacity of each connection's outbound packet queue.
const OUTBOUND_QUEUE: usize = 64;

/// Pause after a failed accept, typically descriptor exhaustion, before
/// retrying.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// State shared by every connection.
pub struct ServerState {
    registry: PacketRegistry,
    devices: DeviceDirectory,
    profiles: ProfileDirectory,
    connections: ConnectionRegistry,
}

impl ServerState {
    pub fn new(registry: PacketRegistry, devices: DeviceDirectory, profiles: ProfileDirectory) -> Self {
        Self {
            registry,
            devices,
            profiles,
            connections: ConnectionRegistry::new(),
        }
    }

    /// Builds the state from the standard packet registry and the records
    /// in `store`.
    pub async fn from_store(store: Arc<dyn DeviceStore>) -> ServerResult<Self> {
        let registry = PacketRegistry::standard()?;
        let profiles = ProfileDirectory::load(store.as_ref()).await?;
        let devices = DeviceDirectory::load(store).await?;
        Ok(Self::new(registry, devices, profiles))
    }

    pub fn registry(&self) -> &PacketRegistry {
        &self.registry
    }

    pub fn devices(&self) -> &DeviceDirectory {
        &self.devices
    }

    pub fn profiles(&self) -> &ProfileDirectory {
        &self.profiles
    }

    pub fn connections(&self) -> &ConnectionRegistry {
        &self.connections
    }
}

/// A bound listener serving the identify exchange.
pub struct Server {
    listener: TcpListener,
    state: Arc<ServerState>,
}

impl Server {
    pub async fn bind(address: &str, state: ServerState) -> ServerResult<Self> {
        let listener = TcpListener::bind(address).await?;
        Ok(Self {
            listener,
            state: Arc::new(state),
        })
    }

    pub fn local_addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn state(&self) -> &Arc<ServerState> {
        &self.state
    }

    /// Accepts connections until the task is dropped. Each connection runs in
    /// its own task; a failing connection never stops the loop.
    pub async fn run(self) -> ServerResult<()> {
        info!(address = %self.local_addr()?, "Listening for devices");
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(serve_connection(state, stream, peer));
                }
                Err(e) => {
                    warn!("Failed to accept connection: {e}");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            }
        }
    }
}

/// Runs the identify exchange on one accepted stream until the peer closes
/// it or the connection fails.
pub async fn serve_connection(state: Arc<ServerState>, stream: TcpStream, peer: SocketAddr) {
    let (mut reader, writer) = stream.into_split();
    let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_QUEUE);
    let handle = ConnectionHandle::new(outbound_tx);
    let connection = handle.id();
    info!(event = "connection-opened", %peer, %connection, "Connection opened");

    let writer = tokio::spawn(write_outbound(Arc::clone(&state), writer, outbound_rx));
    let mut session = Session::new(Arc::clone(&state), handle);

    let result: ServerResult<()> = async {
        while let Some(packet) = read_packet(&mut reader, state.registry()).await? {
            if let Some(reply) = session.handle(packet).await? {
                session.connection().send(reply).await?;
            }
        }
        Ok(())
    }
    .await;

    match &result {
        Ok(()) => info!(event = "connection-closed", %peer, %connection, "Connection closed"),
        Err(e) => warn!(event = "connection-reset", %peer, %connection, error = %e, "Connection reset"),
    }

    session.close().await;
    drop(session);
    if let Err(e) = writer.await {
        debug!(%connection, "Writer task ended abnormally: {e}");
    }
}

/// Drains the outbound queue onto the socket. Ends when every handle to
/// the queue is dropped or the socket fails.
async fn write_outbound(
    state: Arc<ServerState>,
    mut writer: OwnedWriteHalf,
    mut outbound: mpsc::Receiver<Packet>,
) {
    while let Some(packet) = outbound.recv().await {
        if let Err(e) = write_packet(&mut writer, state.registry(), &packet).await {
            debug!("Dropping outbound queue after write failure: {e}");
            return;
        }
    }
}

