//! Text encodings shared by the engine.
//!
//! Passwords, messages and file contents are hashed and encrypted as
//! UTF-16LE. Fingerprints and exported keys are URL-safe base64 without
//! padding.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

/// Encodes `text` as UTF-16 little-endian bytes.
pub fn utf16_bytes(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// Decodes UTF-16 little-endian bytes. Returns `None` for an odd byte count
/// or unpaired surrogates.
pub fn from_utf16_bytes(bytes: &[u8]) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).ok()
}

/// URL-safe base64 without padding (`+` → `-`, `/` → `_`, no `=`).
pub fn to_safe_base64(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decodes URL-safe base64, with or without trailing padding.
pub fn from_safe_base64(encoded: &str) -> Option<Vec<u8>> {
    URL_SAFE_NO_PAD.decode(encoded.trim_end_matches('=')).ok()
}
