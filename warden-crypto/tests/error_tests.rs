use warden_crypto::CryptoError;

#[test]
fn error_display_invalid_salt_length() {
    let err = CryptoError::InvalidSaltLength {
        expected: 32,
        actual: 16,
    };
    let msg = format!("{err}");
    assert!(msg.contains("32"));
    assert!(msg.contains("16"));
}

#[test]
fn error_display_password_mismatch() {
    let err = CryptoError::PasswordMismatch;
    assert!(format!("{err}").contains("password"));
}

#[test]
fn error_display_integrity_mismatch() {
    let err = CryptoError::IntegrityMismatch;
    assert!(format!("{err}").contains("integrity"));
}

#[test]
fn error_display_key_import() {
    let err = CryptoError::KeyImportFailure("bad der".into());
    let msg = format!("{err}");
    assert!(msg.contains("key import failed"));
    assert!(msg.contains("bad der"));
}

#[test]
fn error_display_decryption() {
    let err = CryptoError::Decryption("wrong key".into());
    assert!(format!("{err}").contains("decryption failed"));
}

#[test]
fn error_from_io() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: CryptoError = io.into();
    assert!(matches!(err, CryptoError::Io(_)));
    assert!(format!("{err}").contains("gone"));
}

#[test]
fn error_is_debug() {
    let err = CryptoError::Encryption("test".into());
    let _ = format!("{err:?}");
}
