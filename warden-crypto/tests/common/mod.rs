//! Shared test helpers for crypto tests.

#![allow(dead_code)]

use std::sync::OnceLock;
use warden_crypto::{generate_keypair, KeyPair};

/// Returns a key pair generated once per test binary. RSA generation is
/// too slow to repeat in every test.
pub fn shared_keypair() -> &'static KeyPair {
    static KEYPAIR: OnceLock<KeyPair> = OnceLock::new();
    KEYPAIR.get_or_init(|| generate_keypair().unwrap())
}

/// A second, unrelated key pair.
pub fn other_keypair() -> &'static KeyPair {
    static KEYPAIR: OnceLock<KeyPair> = OnceLock::new();
    KEYPAIR.get_or_init(|| generate_keypair().unwrap())
}
