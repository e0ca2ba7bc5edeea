//! Hybrid encryption: RSA for confidentiality plus a plaintext digest for
//! integrity.
//!
//! Packet layout:
//!
//! ```text
//! [u32 LE ciphertext length][RSA PKCS#1 v1.5 ciphertext][SHA-256 of plaintext]
//! ```
//!
//! The plaintext is the UTF-16LE encoding of the message. With a 2048-bit
//! key that limits messages to 122 UTF-16 code units.

use crate::encoding::{from_utf16_bytes, utf16_bytes};
use crate::error::{CryptoError, CryptoResult};
use crate::keys::{PrivateKey, PublicKey};
use rsa::Pkcs1v15Encrypt;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::warn;
use zeroize::Zeroizing;

/// Size of the appended plaintext digest.
pub const DIGEST_SIZE: usize = 32;

const LENGTH_PREFIX_SIZE: usize = 4;

/// Encrypts `message` for the holder of `recipient`'s private key.
///
/// # Errors
/// [`CryptoError::Encryption`] if the message is too long for the key.
pub fn encrypt(message: &str, recipient: &PublicKey) -> CryptoResult<Vec<u8>> {
    let plaintext = Zeroizing::new(utf16_bytes(message));
    let ciphertext = recipient
        .as_rsa()
        .encrypt(&mut rand::rngs::OsRng, Pkcs1v15Encrypt, &plaintext)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;
    let digest = Sha256::digest(plaintext.as_slice());

    let ciphertext_len = u32::try_from(ciphertext.len())
        .map_err(|_| CryptoError::Encryption("ciphertext too large".to_string()))?;

    let mut packet = Vec::with_capacity(LENGTH_PREFIX_SIZE + ciphertext.len() + DIGEST_SIZE);
    packet.extend_from_slice(&ciphertext_len.to_le_bytes());
    packet.extend_from_slice(&ciphertext);
    packet.extend_from_slice(&digest);
    Ok(packet)
}

/// Decrypts a packet produced by [`encrypt`] and verifies its digest.
///
/// # Errors
/// [`CryptoError::IntegrityMismatch`] if the packet is malformed, cannot be
/// decrypted with `key`, or its plaintext does not match the transmitted
/// digest.
pub fn decrypt(packet: &[u8], key: &PrivateKey) -> CryptoResult<String> {
    let (ciphertext, sent_digest) = split_packet(packet).ok_or_else(integrity_failure)?;

    let plaintext = Zeroizing::new(
        key.as_rsa()
            .decrypt_blinded(&mut rand::rngs::OsRng, Pkcs1v15Encrypt, ciphertext)
            .map_err(|_| integrity_failure())?,
    );

    let digest = Sha256::digest(plaintext.as_slice());
    if !bool::from(digest.as_slice().ct_eq(sent_digest)) {
        return Err(integrity_failure());
    }

    from_utf16_bytes(&plaintext).ok_or_else(integrity_failure)
}

fn split_packet(packet: &[u8]) -> Option<(&[u8], &[u8])> {
    let prefix: [u8; LENGTH_PREFIX_SIZE] = packet.get(..LENGTH_PREFIX_SIZE)?.try_into().ok()?;
    let ciphertext_len = u32::from_le_bytes(prefix) as usize;
    let body = &packet[LENGTH_PREFIX_SIZE..];
    if body.len() != ciphertext_len.checked_add(DIGEST_SIZE)? {
        return None;
    }
    Some(body.split_at(ciphertext_len))
}

fn integrity_failure() -> CryptoError {
    warn!(event = "crypto-failure", reason = "integrity-mismatch", "hybrid packet rejected");
    CryptoError::IntegrityMismatch
}
