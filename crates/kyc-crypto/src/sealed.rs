//! Sealed uploads: digest + encrypt + storage name in one step
//!
//! The record is what the upload handler persists next to the object
//! reference (a database row, object metadata). On download, [`open`] checks
//! the decrypted bytes against the recorded digest, which catches the
//! corruption that CBC padding alone can miss.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::codec::FileCodec;
use crate::error::{CodecError, CodecResult};
use crate::integrity::{generate_file_hash, verify_file_integrity};
use crate::ALGORITHM;

/// Everything the caller needs to store about an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedRecord {
    /// Object name for the container: `{unix_millis}_{original_filename}.enc`
    pub stored_name: String,
    pub original_filename: String,
    pub original_size: u64,
    pub container_size: u64,
    /// SHA-256 of the plaintext (hex)
    pub file_hash: String,
    /// Container IV (hex)
    pub iv: String,
    pub algorithm: String,
}

/// A container ready for upload, plus its record.
#[derive(Debug, Clone)]
pub struct SealedFile {
    pub record: SealedRecord,
    pub container: Vec<u8>,
}

/// Hash and encrypt `plaintext` for upload under a timestamped `.enc` name.
pub fn seal(codec: &FileCodec, original_filename: &str, plaintext: &[u8]) -> CodecResult<SealedFile> {
    let file_hash = generate_file_hash(plaintext);
    let out = codec.encrypt(plaintext)?;

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let stored_name = stored_name(original_filename, millis);

    tracing::debug!(
        stored_name = %stored_name,
        original_size = out.original_size,
        container_size = out.container_size,
        "sealed file"
    );

    Ok(SealedFile {
        record: SealedRecord {
            stored_name,
            original_filename: original_filename.to_string(),
            original_size: out.original_size,
            container_size: out.container_size,
            file_hash,
            iv: out.iv,
            algorithm: ALGORITHM.to_string(),
        },
        container: out.container,
    })
}

/// Decrypt a downloaded container, verifying the recorded digest if given.
pub fn open(codec: &FileCodec, container: &[u8], expected_hash: Option<&str>) -> CodecResult<Vec<u8>> {
    let plaintext = codec.decrypt(container)?;

    if let Some(expected) = expected_hash {
        if !verify_file_integrity(&plaintext, expected) {
            return Err(CodecError::IntegrityMismatch {
                expected: expected.to_string(),
                actual: generate_file_hash(&plaintext),
            });
        }
    }

    Ok(plaintext)
}

/// Object name for a sealed file. Only the final path component of the
/// original name is kept so uploads cannot steer the storage layout.
fn stored_name(original_filename: &str, unix_millis: u128) -> String {
    let base = original_filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .unwrap_or("file");
    format!("{unix_millis}_{base}.enc")
}
