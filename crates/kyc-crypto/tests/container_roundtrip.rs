//! End-to-end tests for the container codec as the upload path uses it:
//! configuration from the environment, large documents, shared codecs.

use std::collections::HashSet;
use std::sync::Arc;

use kyc_core::CryptoConfig;
use kyc_crypto::{
    encryption_metadata, generate_file_hash, is_encrypted, open, seal, verify_file_integrity,
    CodecError, DerivedKey, EncryptionConfig, FileCodec,
};

fn fixed_codec() -> FileCodec {
    FileCodec::new(EncryptionConfig::from_key(DerivedKey::from_bytes([42u8; 32])))
}

fn env_codec(var: &str, secret: &str, salt: &str) -> FileCodec {
    std::env::set_var(var, secret);
    let config = CryptoConfig {
        salt: salt.into(),
        passphrase_env: var.into(),
        scrypt_log_n: 10,
        ..CryptoConfig::default()
    };
    FileCodec::new(EncryptionConfig::from_env(&config).expect("codec config"))
}

#[test]
fn ten_megabyte_document_roundtrip() {
    let codec = fixed_codec();
    let data = vec![b'A'; 10_000_000];

    let out = codec.encrypt(&data).unwrap();
    assert_eq!(out.original_size, 10_000_000);
    // 10_000_004 bytes framed, padded to the next block
    assert_eq!(out.container.len(), 8 + 16 + 10_000_016);

    let decrypted = codec.decrypt(&out.container).unwrap();
    assert_eq!(decrypted.len(), data.len());
    assert!(decrypted == data);
}

#[test]
fn separate_processes_share_key_through_config() {
    // Two codecs built independently from the same secret and salt stand in
    // for the uploading and downloading process.
    let uploader = env_codec("KYC_IT_SECRET_A", "operator-secret", "branch-salt");
    let downloader = env_codec("KYC_IT_SECRET_B", "operator-secret", "branch-salt");

    let container = uploader.encrypt(b"proof of address").unwrap().container;
    assert_eq!(downloader.decrypt(&container).unwrap(), b"proof of address");
}

#[test]
fn changed_salt_cannot_decrypt() {
    let before = env_codec("KYC_IT_SECRET_C", "operator-secret", "salt-2024");
    let after = env_codec("KYC_IT_SECRET_D", "operator-secret", "salt-2025");

    let container = before.encrypt(b"national id card front").unwrap().container;
    let err = after.decrypt(&container).unwrap_err();
    assert!(err.is_corruption(), "got {err}");
}

#[test]
fn concurrent_callers_share_one_codec() {
    let codec = Arc::new(fixed_codec());

    let handles: Vec<_> = (0..8u8)
        .map(|worker| {
            let codec = Arc::clone(&codec);
            std::thread::spawn(move || {
                let mut ivs = Vec::new();
                for i in 0..25u8 {
                    let data = vec![worker ^ i; 1000 + i as usize];
                    let out = codec.encrypt(&data).unwrap();
                    assert_eq!(codec.decrypt(&out.container).unwrap(), data);
                    ivs.push(out.iv);
                }
                ivs
            })
        })
        .collect();

    let mut all = HashSet::new();
    for handle in handles {
        for iv in handle.join().unwrap() {
            assert!(all.insert(iv), "IV reused across threads");
        }
    }
    assert_eq!(all.len(), 200);
}

#[test]
fn upload_download_with_persisted_digest() {
    let codec = fixed_codec();
    let document = b"\xFF\xD8\xFF\xE0\x00\x10JFIF passport photo bytes".to_vec();

    let sealed = seal(&codec, "passport.jpg", &document).unwrap();
    assert!(is_encrypted(&sealed.container));

    let meta = encryption_metadata(&sealed.container);
    assert_eq!(meta.container.unwrap().iv_hex, sealed.record.iv);

    let restored = open(&codec, &sealed.container, Some(&sealed.record.file_hash)).unwrap();
    assert_eq!(restored, document);
    assert!(verify_file_integrity(&restored, &sealed.record.file_hash));
    assert_eq!(generate_file_hash(&restored), sealed.record.file_hash);
}

#[test]
fn taxonomy_is_distinguishable() {
    let codec = fixed_codec();
    let container = codec.encrypt(b"bank statement").unwrap().container;

    let not_ours = codec.decrypt(b"%PDF-1.7 this is a plain pdf, not a container");
    assert!(matches!(not_ours, Err(CodecError::InvalidContainerFormat(_))));

    let mut unaligned = container.clone();
    unaligned.push(0);
    assert!(matches!(codec.decrypt(&unaligned), Err(CodecError::DecryptionFailure)));
}
