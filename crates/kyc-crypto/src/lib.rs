//! kyc-crypto: encryption and integrity for stored KYC documents
//!
//! Architecture: one immutable key per process, one random IV per file.
//!
//! Pipeline: plaintext → SHA-256 digest (kept by caller) → length-frame → AES-256-CBC → container → object store
//!
//! Container layout:
//! ```text
//! [8 bytes: "KYC_ENC_"][16 bytes: random IV][N bytes: ciphertext]
//!
//! ciphertext = AES-256-CBC(key, IV, PKCS#7(u32_be(len) || plaintext))
//! key        = scrypt(passphrase, salt)   (derived once, at startup)
//! ```
//!
//! There is no MAC. Tampering is caught by the padding and length-header
//! checks with high probability only; callers that need a hard guarantee
//! persist the plaintext digest (see [`sealed`]) and compare on download.

pub mod codec;
pub mod config;
pub mod error;
pub mod integrity;
pub mod kdf;
pub mod sealed;

pub use codec::{encryption_metadata, is_encrypted, ContainerInfo, EncryptionMetadata, EncryptionOutput, FileCodec};
pub use config::EncryptionConfig;
pub use error::{CodecError, CodecResult};
pub use integrity::{generate_file_hash, verify_file_integrity};
pub use kdf::{derive_key, DerivedKey, KdfParams};
pub use sealed::{open, seal, SealedFile, SealedRecord};

/// Size of the derived AES key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of a CBC initialization vector (one AES block)
pub const IV_SIZE: usize = 16;

/// AES block size
pub const BLOCK_SIZE: usize = 16;

/// Size of the big-endian plaintext length header inside the ciphertext
pub const LENGTH_HEADER_SIZE: usize = 4;

/// Marker prefixing every container
pub const SIGNATURE: &[u8; 8] = b"KYC_ENC_";

/// Cipher identifier reported in metadata and sealed records
pub const ALGORITHM: &str = "aes-256-cbc";

/// Smallest well-formed container: signature, IV and one cipher block.
pub const MIN_CONTAINER_SIZE: usize = SIGNATURE.len() + IV_SIZE + BLOCK_SIZE;
