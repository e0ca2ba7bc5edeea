//! Salted secure hashing.
//!
//! PBKDF2-HMAC-SHA256 with 1000 iterations, a 32-byte salt and a 256-byte
//! output. Used for password verification records and for deriving the
//! symmetric file key.

use crate::error::{CryptoError, CryptoResult};
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of salt in bytes.
pub const SALT_SIZE: usize = 32;

/// Size of the derived hash in bytes.
pub const SECURE_HASH_SIZE: usize = 256;

/// PBKDF2 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 1000;

/// Salt for secure hashing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Salt {
    bytes: [u8; SALT_SIZE],
}

impl Salt {
    /// Generates a random salt.
    pub fn random() -> Self {
        let mut bytes = [0u8; SALT_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Creates a salt from raw bytes.
    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self { bytes }
    }

    /// Creates a salt from a slice.
    ///
    /// # Errors
    /// [`CryptoError::InvalidSaltLength`] unless the slice is exactly
    /// [`SALT_SIZE`] bytes long.
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let bytes: [u8; SALT_SIZE] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidSaltLength {
                    expected: SALT_SIZE,
                    actual: bytes.len(),
                })?;
        Ok(Self { bytes })
    }

    /// Returns the salt bytes.
    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.bytes
    }
}

/// A derived secure hash, zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecureHash {
    bytes: [u8; SECURE_HASH_SIZE],
}

impl SecureHash {
    /// Returns the hash bytes.
    pub fn as_bytes(&self) -> &[u8; SECURE_HASH_SIZE] {
        &self.bytes
    }

    /// Constant-time, element-wise comparison against a stored hash.
    /// Buffers of a different length never match.
    pub fn verify(&self, expected: &[u8]) -> bool {
        self.bytes[..].ct_eq(expected).into()
    }
}

impl PartialEq for SecureHash {
    fn eq(&self, other: &Self) -> bool {
        self.verify(&other.bytes)
    }
}

impl Eq for SecureHash {}

impl std::fmt::Debug for SecureHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureHash")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Derives a secure hash of `data` with a caller-supplied salt.
///
/// # Errors
/// [`CryptoError::InvalidSaltLength`] if `salt` is not [`SALT_SIZE`] bytes.
pub fn derive_secure_hash(data: &[u8], salt: &[u8]) -> CryptoResult<SecureHash> {
    let salt = Salt::from_slice(salt)?;
    Ok(derive_with_salt(data, &salt))
}

/// Derives a secure hash of `data` with a freshly generated random salt.
pub fn derive_secure_hash_with_random_salt(data: &[u8]) -> (Salt, SecureHash) {
    let salt = Salt::random();
    let hash = derive_with_salt(data, &salt);
    (salt, hash)
}

pub(crate) fn derive_with_salt(data: &[u8], salt: &Salt) -> SecureHash {
    let mut bytes = [0u8; SECURE_HASH_SIZE];
    pbkdf2::pbkdf2_hmac::<Sha256>(data, salt.as_bytes(), PBKDF2_ITERATIONS, &mut bytes);
    SecureHash { bytes }
}
