//! Coordinating server for Warden device fleets.
//!
//! Devices connect over TCP and present an [`IdentityMessage`]. The server
//! resolves it against the [`DeviceDirectory`]:
//!
//! - a known hardware id is answered with the stored record (which may carry
//!   a profile assigned since the device was first seen);
//! - an unknown one is stored with no profile and acknowledged with
//!   `StatusMessage { Ok, correlation_id: 1 }`.
//!
//! Either way the connection is registered under the device's hardware id
//! in the [`ConnectionRegistry`]. Privileged requests must pass the
//! [`ProfileDirectory`] authorization gate.
//!
//! [`IdentityMessage`]: warden_protocol::IdentityMessage

mod config;
mod connections;
mod directory;
mod error;
mod profiles;
mod server;
mod session;
mod store;

pub use config::{ServerConfig, DEFAULT_CONFIG_PATH, DEFAULT_LISTEN_ADDRESS};
pub use connections::{ConnectionHandle, ConnectionRegistry};
pub use directory::{DeviceDirectory, Recognition};
pub use error::{Denial, ServerError, ServerResult};
pub use profiles::ProfileDirectory;
pub use server::{serve_connection, Server, ServerState};
pub use session::{Session, SessionState, ALREADY_IDENTIFIED, PROVISIONED_CORRELATION_ID};
pub use store::{DeviceStore, JsonConfigStore, MemoryStore};
