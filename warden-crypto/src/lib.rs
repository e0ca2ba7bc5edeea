//! Cryptographic engine for Warden.
//!
//! Provides:
//! - Salted secure hashing (PBKDF2-HMAC-SHA256, 32-byte salt, 256-byte output)
//! - RSA key generation and password-sealed private key records
//! - Hybrid encryption: RSA ciphertext followed by a SHA-256 plaintext digest
//! - Symmetric at-rest file sealing (AES-256-CBC, PKCS#7)
//! - Hardware fingerprinting from network interface addresses
//!
//! Every operation is synchronous and holds no state between calls, so the
//! functions here can be called from any number of threads at once.
//! Password and integrity failures are reported, never retried, and logged
//! as `crypto-failure` events.

mod encoding;
mod error;
mod file;
mod fingerprint;
mod hash;
mod hybrid;
mod keys;

pub use encoding::{from_safe_base64, from_utf16_bytes, to_safe_base64, utf16_bytes};
pub use error::{CryptoError, CryptoResult};
pub use file::{open_content, open_file, seal_content, seal_file, FILE_HEADER_SIZE, IV_SIZE};
pub use fingerprint::{
    device_fingerprint, fingerprint_from_addresses, fingerprint_from_interfaces, is_operational,
};
pub use hash::{
    derive_secure_hash, derive_secure_hash_with_random_salt, Salt, SecureHash,
    PBKDF2_ITERATIONS, SALT_SIZE, SECURE_HASH_SIZE,
};
pub use hybrid::{decrypt, encrypt, DIGEST_SIZE};
pub use keys::{
    generate_keypair, open_private_key, open_private_key_record, seal_private_key,
    seal_private_key_record, KeyPair, PrivateKey, PublicKey, RSA_KEY_BITS,
};
