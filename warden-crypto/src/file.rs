//! Symmetric at-rest sealing of text content.
//!
//! Sealed layout:
//!
//! ```text
//! [32-byte salt][64-byte IV][AES-256-CBC / PKCS#7 ciphertext]
//! ```
//!
//! The file key is the leading 256 bits of the secure hash of the UTF-16
//! key string under the stored salt. The IV slot is a fixed 64 bytes of
//! random data; CBC consumes its leading cipher block. Changing either
//! width breaks every previously sealed file.

use crate::encoding::{from_utf16_bytes, utf16_bytes};
use crate::error::{CryptoError, CryptoResult};
use crate::hash::{derive_secure_hash_with_random_salt, derive_with_salt, Salt, SALT_SIZE};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use std::fs;
use std::path::Path;
use tracing::warn;
use zeroize::Zeroizing;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Size of the IV slot in a sealed file.
pub const IV_SIZE: usize = 64;

/// Size of the salt and IV header preceding the ciphertext.
pub const FILE_HEADER_SIZE: usize = SALT_SIZE + IV_SIZE;

const FILE_KEY_SIZE: usize = 32;
const CBC_IV_SIZE: usize = 16;

/// Seals `content` under `key` and returns the sealed bytes.
pub fn seal_content(content: &str, key: &str) -> CryptoResult<Vec<u8>> {
    let key_bytes = Zeroizing::new(utf16_bytes(key));
    let (salt, derived) = derive_secure_hash_with_random_salt(&key_bytes);

    let mut iv = [0u8; IV_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut iv);

    let cipher =
        Aes256CbcEnc::new_from_slices(&derived.as_bytes()[..FILE_KEY_SIZE], &iv[..CBC_IV_SIZE])
            .map_err(|e| CryptoError::Encryption(e.to_string()))?;
    let plaintext = Zeroizing::new(utf16_bytes(content));
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(&plaintext);

    let mut sealed = Vec::with_capacity(FILE_HEADER_SIZE + ciphertext.len());
    sealed.extend_from_slice(salt.as_bytes());
    sealed.extend_from_slice(&iv);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Opens bytes produced by [`seal_content`].
///
/// # Errors
/// [`CryptoError::Decryption`] if the data is shorter than the header, the
/// key is wrong, or the content is damaged.
pub fn open_content(sealed: &[u8], key: &str) -> CryptoResult<String> {
    if sealed.len() < FILE_HEADER_SIZE {
        return Err(decryption_failure("sealed content is shorter than its header"));
    }
    let (salt, rest) = sealed.split_at(SALT_SIZE);
    let (iv, ciphertext) = rest.split_at(IV_SIZE);

    let salt = Salt::from_slice(salt)?;
    let key_bytes = Zeroizing::new(utf16_bytes(key));
    let derived = derive_with_salt(&key_bytes, &salt);

    let cipher =
        Aes256CbcDec::new_from_slices(&derived.as_bytes()[..FILE_KEY_SIZE], &iv[..CBC_IV_SIZE])
            .map_err(|e| CryptoError::Decryption(e.to_string()))?;
    let plaintext = Zeroizing::new(
        cipher
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| decryption_failure("wrong key or damaged content"))?,
    );

    from_utf16_bytes(&plaintext).ok_or_else(|| decryption_failure("content is not valid UTF-16"))
}

/// Seals `content` under `key` into the file at `path`, replacing it.
pub fn seal_file(path: impl AsRef<Path>, content: &str, key: &str) -> CryptoResult<()> {
    let sealed = seal_content(content, key)?;
    fs::write(path, sealed)?;
    Ok(())
}

/// Reads and opens a file written by [`seal_file`].
pub fn open_file(path: impl AsRef<Path>, key: &str) -> CryptoResult<String> {
    let sealed = fs::read(path)?;
    open_content(&sealed, key)
}

fn decryption_failure(reason: &str) -> CryptoError {
    warn!(event = "crypto-failure", reason, "sealed content rejected");
    CryptoError::Decryption(reason.to_string())
}
