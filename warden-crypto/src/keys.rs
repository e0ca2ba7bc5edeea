//! RSA key pairs and password-sealed private key records.
//!
//! A sealed record is laid out as
//!
//! ```text
//! [u32 LE envelope length][encrypted PKCS#8 envelope][32-byte salt][256-byte verification hash]
//! ```
//!
//! The envelope is PBES2 (PBKDF2-SHA256, 1000 iterations, AES-256-CBC)
//! keyed by the password. The verification hash is the secure hash of the
//! UTF-16 password bytes under the stored salt. It lets a wrong password be
//! rejected before the envelope is touched.

use crate::encoding::{to_safe_base64, utf16_bytes};
use crate::error::{CryptoError, CryptoResult};
use crate::hash::{
    derive_secure_hash_with_random_salt, derive_with_salt, Salt, PBKDF2_ITERATIONS, SALT_SIZE,
    SECURE_HASH_SIZE,
};
use pkcs8::pkcs5::pbes2;
use pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, PrivateKeyInfo};
use rand::RngCore;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fs;
use std::path::Path;
use tracing::warn;
use zeroize::Zeroizing;

/// Modulus size of generated keys.
pub const RSA_KEY_BITS: usize = 2048;

const LENGTH_PREFIX_SIZE: usize = 4;
const ENVELOPE_SALT_SIZE: usize = 16;
const ENVELOPE_IV_SIZE: usize = 16;

/// An RSA private key.
#[derive(Clone)]
pub struct PrivateKey(RsaPrivateKey);

impl PrivateKey {
    /// Returns the matching public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(RsaPublicKey::from(&self.0))
    }

    /// Exports the key as unencrypted PKCS#8 DER.
    pub fn to_pkcs8_der(&self) -> CryptoResult<Zeroizing<Vec<u8>>> {
        let document = self
            .0
            .to_pkcs8_der()
            .map_err(|e| CryptoError::KeyImportFailure(e.to_string()))?;
        Ok(Zeroizing::new(document.as_bytes().to_vec()))
    }

    /// Imports a key from unencrypted PKCS#8 DER.
    pub fn from_pkcs8_der(der: &[u8]) -> CryptoResult<Self> {
        RsaPrivateKey::from_pkcs8_der(der)
            .map(Self)
            .map_err(|e| CryptoError::KeyImportFailure(e.to_string()))
    }

    pub(crate) fn as_rsa(&self) -> &RsaPrivateKey {
        &self.0
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// An RSA public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey(RsaPublicKey);

impl PublicKey {
    /// Exports the key as SubjectPublicKeyInfo DER.
    pub fn to_der(&self) -> CryptoResult<Vec<u8>> {
        self.0
            .to_public_key_der()
            .map(|document| document.as_bytes().to_vec())
            .map_err(|e| CryptoError::KeyImportFailure(e.to_string()))
    }

    /// Imports a key from SubjectPublicKeyInfo DER.
    pub fn from_der(der: &[u8]) -> CryptoResult<Self> {
        RsaPublicKey::from_public_key_der(der)
            .map(Self)
            .map_err(|e| CryptoError::KeyImportFailure(e.to_string()))
    }

    /// The DER export as URL-safe base64, for display and config files.
    pub fn to_base64(&self) -> CryptoResult<String> {
        Ok(to_safe_base64(&self.to_der()?))
    }

    pub(crate) fn as_rsa(&self) -> &RsaPublicKey {
        &self.0
    }
}

/// A private key together with its public half.
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub private: PrivateKey,
    pub public: PublicKey,
}

/// Generates a fresh RSA key pair of [`RSA_KEY_BITS`] bits.
pub fn generate_keypair() -> CryptoResult<KeyPair> {
    let private = RsaPrivateKey::new(&mut rand::rngs::OsRng, RSA_KEY_BITS)
        .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
    let private = PrivateKey(private);
    let public = private.public_key();
    Ok(KeyPair { private, public })
}

/// Encodes `key` as a sealed record (see the module docs for the layout).
pub fn seal_private_key_record(key: &PrivateKey, password: &str) -> CryptoResult<Vec<u8>> {
    let envelope = encrypt_envelope(key, password)?;
    let envelope_len = u32::try_from(envelope.len())
        .map_err(|_| CryptoError::KeyImportFailure("key envelope too large".to_string()))?;

    let password_bytes = Zeroizing::new(utf16_bytes(password));
    let (salt, hash) = derive_secure_hash_with_random_salt(&password_bytes);

    let mut record =
        Vec::with_capacity(LENGTH_PREFIX_SIZE + envelope.len() + SALT_SIZE + SECURE_HASH_SIZE);
    record.extend_from_slice(&envelope_len.to_le_bytes());
    record.extend_from_slice(&envelope);
    record.extend_from_slice(salt.as_bytes());
    record.extend_from_slice(hash.as_bytes());
    Ok(record)
}

/// Seals `key` with `password` and writes the record to `path`, replacing
/// the file.
pub fn seal_private_key(path: impl AsRef<Path>, key: &PrivateKey, password: &str) -> CryptoResult<()> {
    let record = seal_private_key_record(key, password)?;
    fs::write(path, record)?;
    Ok(())
}

/// Opens the sealed record starting at `offset` in `data`.
///
/// Returns the key and the number of bytes the record occupies, so that
/// consecutive records can be read one after another.
///
/// # Errors
/// - [`CryptoError::PasswordMismatch`] if the password does not match the
///   verification hash. The envelope is not decrypted in that case.
/// - [`CryptoError::KeyImportFailure`] if the record is truncated or the
///   envelope cannot be decrypted and parsed.
pub fn open_private_key_record(
    data: &[u8],
    offset: usize,
    password: &str,
) -> CryptoResult<(PrivateKey, usize)> {
    let record = data.get(offset..).ok_or_else(truncated)?;
    let prefix: [u8; LENGTH_PREFIX_SIZE] = record
        .get(..LENGTH_PREFIX_SIZE)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(truncated)?;
    let envelope_len = u32::from_le_bytes(prefix) as usize;

    let salt_start = LENGTH_PREFIX_SIZE + envelope_len;
    let hash_start = salt_start + SALT_SIZE;
    let total = hash_start + SECURE_HASH_SIZE;
    let record = record.get(..total).ok_or_else(truncated)?;

    let envelope = &record[LENGTH_PREFIX_SIZE..salt_start];
    let salt = Salt::from_slice(&record[salt_start..hash_start])?;
    let stored_hash = &record[hash_start..total];

    let password_bytes = Zeroizing::new(utf16_bytes(password));
    let candidate = derive_with_salt(&password_bytes, &salt);
    if !candidate.verify(stored_hash) {
        warn!(event = "crypto-failure", reason = "password-mismatch", offset, "sealed key rejected");
        return Err(CryptoError::PasswordMismatch);
    }

    let key = RsaPrivateKey::from_pkcs8_encrypted_der(envelope, password.as_bytes())
        .map_err(|e| CryptoError::KeyImportFailure(e.to_string()))?;
    Ok((PrivateKey(key), total))
}

/// Reads the sealed record at `offset` in the file at `path`.
///
/// See [`open_private_key_record`] for the error cases; filesystem errors
/// are returned as [`CryptoError::Io`].
pub fn open_private_key(
    path: impl AsRef<Path>,
    offset: usize,
    password: &str,
) -> CryptoResult<(PrivateKey, usize)> {
    let data = Zeroizing::new(fs::read(path)?);
    open_private_key_record(&data, offset, password)
}

fn encrypt_envelope(key: &PrivateKey, password: &str) -> CryptoResult<Vec<u8>> {
    let der = key
        .0
        .to_pkcs8_der()
        .map_err(|e| CryptoError::KeyImportFailure(e.to_string()))?;
    let info = PrivateKeyInfo::try_from(der.as_bytes())
        .map_err(|e| CryptoError::KeyImportFailure(e.to_string()))?;

    let mut salt = [0u8; ENVELOPE_SALT_SIZE];
    let mut iv = [0u8; ENVELOPE_IV_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    rand::rngs::OsRng.fill_bytes(&mut iv);

    let params = pbes2::Parameters::pbkdf2_sha256_aes256cbc(PBKDF2_ITERATIONS, &salt, &iv)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;
    let envelope = info
        .encrypt_with_params(params, password.as_bytes())
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;
    Ok(envelope.as_bytes().to_vec())
}

fn truncated() -> CryptoError {
    CryptoError::KeyImportFailure("sealed key record is truncated".to_string())
}
