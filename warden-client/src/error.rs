//! Error types for the client.

use thiserror::Error;
use warden_crypto::CryptoError;
use warden_protocol::ProtocolError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to the server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration file error.
    #[error(transparent)]
    Types(#[from] warden_types::Error),

    /// Key or fingerprint error.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Packet encoding or framing error.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The server answered with something the exchange does not allow.
    #[error("unexpected reply: {0}")]
    UnexpectedReply(String),

    /// The server closed the connection before replying.
    #[error("connection closed by server")]
    ConnectionClosed,

    /// Socket error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
