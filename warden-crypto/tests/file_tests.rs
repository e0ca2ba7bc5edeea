use warden_crypto::{
    open_content, open_file, seal_content, seal_file, CryptoError, FILE_HEADER_SIZE, IV_SIZE,
    SALT_SIZE,
};

#[test]
fn seal_open_roundtrip() {
    let sealed = seal_content("device list", "storage key").unwrap();
    assert_eq!(open_content(&sealed, "storage key").unwrap(), "device list");
}

#[test]
fn seal_open_empty() {
    let sealed = seal_content("", "k").unwrap();
    assert_eq!(open_content(&sealed, "k").unwrap(), "");
}

#[test]
fn seal_open_large_unicode() {
    let content = "Zeile äöü 🚀\n".repeat(2_000);
    let sealed = seal_content(&content, "k").unwrap();
    assert_eq!(open_content(&sealed, "k").unwrap(), content);
}

#[test]
fn sealed_layout() {
    let sealed = seal_content("abc", "k").unwrap();
    assert_eq!(FILE_HEADER_SIZE, SALT_SIZE + IV_SIZE);
    assert_eq!(FILE_HEADER_SIZE, 96);
    let ciphertext_len = sealed.len() - FILE_HEADER_SIZE;
    // "abc" is 6 bytes of UTF-16, padded to one AES block.
    assert_eq!(ciphertext_len, 16);
}

#[test]
fn same_content_seals_differently() {
    let s1 = seal_content("same", "k").unwrap();
    let s2 = seal_content("same", "k").unwrap();
    assert_ne!(s1[..SALT_SIZE], s2[..SALT_SIZE]);
    assert_ne!(s1[SALT_SIZE..FILE_HEADER_SIZE], s2[SALT_SIZE..FILE_HEADER_SIZE]);
    assert_ne!(s1, s2);
}

#[test]
fn wrong_key_never_yields_content() {
    let content = "the quick brown fox jumps over the lazy dog";
    let sealed = seal_content(content, "right").unwrap();
    match open_content(&sealed, "wrong") {
        Ok(opened) => assert_ne!(opened, content),
        Err(err) => assert!(matches!(err, CryptoError::Decryption(_))),
    }
}

#[test]
fn short_data_is_rejected() {
    let err = open_content(&[0u8; FILE_HEADER_SIZE - 1], "k").unwrap_err();
    assert!(matches!(err, CryptoError::Decryption(_)));
}

#[test]
fn partial_block_is_rejected() {
    let mut sealed = seal_content("abcdefgh", "k").unwrap();
    sealed.pop();
    assert!(matches!(
        open_content(&sealed, "k"),
        Err(CryptoError::Decryption(_))
    ));
}

#[test]
fn seal_and_open_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sealed.bin");
    seal_file(&path, "persisted", "disk key").unwrap();
    assert_eq!(open_file(&path, "disk key").unwrap(), "persisted");

    let raw = std::fs::read(&path).unwrap();
    assert!(raw.len() > FILE_HEADER_SIZE);
}

#[test]
fn open_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        open_file(dir.path().join("missing.bin"), "k"),
        Err(CryptoError::Io(_))
    ));
}
