//! Error types for the crypto engine.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// A caller-supplied salt has the wrong length.
    #[error("invalid salt length: expected {expected}, got {actual}")]
    InvalidSaltLength { expected: usize, actual: usize },

    /// The password does not match the stored verification hash.
    #[error("password does not match the stored verification hash")]
    PasswordMismatch,

    /// Decrypted content does not match its transmitted digest, or the
    /// packet could not be decrypted at all.
    #[error("integrity check failed: payload was corrupted or tampered with")]
    IntegrityMismatch,

    /// A key could not be imported or exported.
    #[error("key import failed: {0}")]
    KeyImportFailure(String),

    /// Key generation failed.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// Encryption failed (e.g. the message is too long for the key).
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Symmetric decryption failed (wrong key or damaged file).
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
