//! Device-side client for Warden.
//!
//! A device computes its identity from the local hardware fingerprint
//! ([`local_identity`]), connects to the server and presents it
//! ([`Client::identify`]). The server either recognizes the device and sends
//! back its stored record, or provisions it and acknowledges.

mod client;
mod config;
mod error;

pub use client::{local_identity, Client, IdentifyOutcome};
pub use config::{ClientConfig, DEFAULT_CONFIG_PATH, DEFAULT_SERVER_ADDRESS};
pub use error::{ClientError, ClientResult};
