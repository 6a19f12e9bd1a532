//! AES-256-CBC file containers
//!
//! Container format (binary):
//! ```text
//! [8 bytes: "KYC_ENC_"][16 bytes: random IV][N bytes: ciphertext]
//! plaintext-before-padding = u32_be(original_len) || original
//! ```
//!
//! The length header lets the PKCS#7 padding be stripped unambiguously and
//! doubles as a cheap consistency check: a wrong key or flipped bits in the
//! first block almost always yield a header that does not fit the payload.

use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{rngs::OsRng, RngCore};
use serde::Serialize;
use zeroize::Zeroize;

use crate::config::EncryptionConfig;
use crate::error::{CodecError, CodecResult};
use crate::{
    ALGORITHM, BLOCK_SIZE, IV_SIZE, KEY_SIZE, LENGTH_HEADER_SIZE, MIN_CONTAINER_SIZE, SIGNATURE,
};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Result of [`FileCodec::encrypt`].
///
/// Only `container` is authoritative; the rest is convenience metadata for
/// the caller's records.
#[derive(Debug, Clone)]
pub struct EncryptionOutput {
    pub container: Vec<u8>,
    /// IV as lowercase hex
    pub iv: String,
    pub original_size: u64,
    pub container_size: u64,
}

/// Diagnostics for a buffer, extracted without the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncryptionMetadata {
    pub encrypted: bool,
    #[serde(flatten)]
    pub container: Option<ContainerInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerInfo {
    pub algorithm: String,
    pub iv_length_bytes: usize,
    pub key_length_bytes: usize,
    pub total_container_size: usize,
    pub iv_hex: String,
}

/// Encrypts and decrypts containers under one derived key.
///
/// Holds no mutable state, so a single instance can be shared by reference
/// (or behind an `Arc`) across any number of threads.
#[derive(Debug, Clone)]
pub struct FileCodec {
    config: EncryptionConfig,
}

impl FileCodec {
    pub fn new(config: EncryptionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncryptionConfig {
        &self.config
    }

    /// Encrypt `plaintext` into a new container with a fresh random IV.
    ///
    /// Fails only if the OS random source is unavailable or the payload is
    /// too large for the 32-bit length header. No partial output on failure.
    pub fn encrypt(&self, plaintext: &[u8]) -> CodecResult<EncryptionOutput> {
        let declared = u32::try_from(plaintext.len()).map_err(|_| {
            CodecError::Encryption(format!(
                "payload of {} bytes does not fit the 32-bit length header",
                plaintext.len()
            ))
        })?;

        let mut iv = [0u8; IV_SIZE];
        OsRng
            .try_fill_bytes(&mut iv)
            .map_err(|e| CodecError::Encryption(format!("secure random source failed: {e}")))?;

        let mut framed = Vec::with_capacity(LENGTH_HEADER_SIZE + plaintext.len());
        framed.extend_from_slice(&declared.to_be_bytes());
        framed.extend_from_slice(plaintext);

        let ciphertext = self.encrypt_framed(&iv, &framed);
        framed.zeroize();
        let ciphertext = ciphertext?;

        let mut container = Vec::with_capacity(SIGNATURE.len() + IV_SIZE + ciphertext.len());
        container.extend_from_slice(SIGNATURE);
        container.extend_from_slice(&iv);
        container.extend_from_slice(&ciphertext);

        Ok(EncryptionOutput {
            iv: hex::encode(iv),
            original_size: plaintext.len() as u64,
            container_size: container.len() as u64,
            container,
        })
    }

    /// Decrypt a container back to the exact bytes passed to `encrypt`.
    pub fn decrypt(&self, container: &[u8]) -> CodecResult<Vec<u8>> {
        if container.len() < MIN_CONTAINER_SIZE {
            return Err(CodecError::InvalidContainerFormat(format!(
                "{} bytes is shorter than the minimum container size of {}",
                container.len(),
                MIN_CONTAINER_SIZE
            )));
        }
        if !is_encrypted(container) {
            return Err(CodecError::InvalidContainerFormat(
                "missing container signature".into(),
            ));
        }

        let (iv, ciphertext) = container[SIGNATURE.len()..].split_at(IV_SIZE);
        if ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(CodecError::DecryptionFailure);
        }

        let payload = Aes256CbcDec::new_from_slices(self.config.key().as_bytes(), iv)
            .map_err(|_| CodecError::DecryptionFailure)?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| CodecError::DecryptionFailure)?;

        unframe(payload)
    }

    fn encrypt_framed(&self, iv: &[u8; IV_SIZE], framed: &[u8]) -> CodecResult<Vec<u8>> {
        let cipher = Aes256CbcEnc::new_from_slices(self.config.key().as_bytes(), iv)
            .map_err(|e| CodecError::Encryption(format!("cipher rejected key or IV: {e}")))?;
        Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(framed))
    }
}

/// Strip the length header and anything past the declared length.
fn unframe(mut payload: Vec<u8>) -> CodecResult<Vec<u8>> {
    if payload.len() < LENGTH_HEADER_SIZE {
        let available = payload.len() as u64;
        payload.zeroize();
        return Err(CodecError::CorruptedLengthHeader {
            declared: LENGTH_HEADER_SIZE as u64,
            available,
        });
    }

    let mut header = [0u8; LENGTH_HEADER_SIZE];
    header.copy_from_slice(&payload[..LENGTH_HEADER_SIZE]);
    let declared = u32::from_be_bytes(header) as usize;
    let available = payload.len() - LENGTH_HEADER_SIZE;

    if declared > available {
        payload.zeroize();
        return Err(CodecError::CorruptedLengthHeader {
            declared: declared as u64,
            available: available as u64,
        });
    }

    payload.drain(..LENGTH_HEADER_SIZE);
    payload.truncate(declared);
    Ok(payload)
}

/// True iff `data` starts with the container signature. Never fails.
pub fn is_encrypted(data: &[u8]) -> bool {
    data.len() >= SIGNATURE.len() && data[..SIGNATURE.len()] == SIGNATURE[..]
}

/// Describe a buffer without decrypting it.
///
/// Only slices bytes, so it works without the key. For a signed buffer that
/// is cut short inside the IV, `iv_hex` holds whatever IV bytes are present.
pub fn encryption_metadata(data: &[u8]) -> EncryptionMetadata {
    if !is_encrypted(data) {
        return EncryptionMetadata {
            encrypted: false,
            container: None,
        };
    }

    let iv_end = data.len().min(SIGNATURE.len() + IV_SIZE);
    EncryptionMetadata {
        encrypted: true,
        container: Some(ContainerInfo {
            algorithm: ALGORITHM.to_string(),
            iv_length_bytes: IV_SIZE,
            key_length_bytes: KEY_SIZE,
            total_container_size: data.len(),
            iv_hex: hex::encode(&data[SIGNATURE.len()..iv_end]),
        }),
    }
}
