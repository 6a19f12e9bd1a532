use thiserror::Error;

pub type CodecResult<T> = Result<T, CodecError>;

/// Failures surfaced by the codec. Nothing here is logged by the codec itself;
/// callers decide how each variant maps to user-facing behaviour.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Missing or invalid secret material or KDF parameters.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Input is not a container: too short or wrong signature.
    #[error("invalid container format: {0}")]
    InvalidContainerFormat(String),

    /// Cipher or padding rejection. Almost always a wrong key or corrupted ciphertext.
    #[error("decryption failed: wrong key or corrupted ciphertext")]
    DecryptionFailure,

    /// The embedded length header disagrees with the decrypted payload.
    #[error("corrupted length header: needs {declared} bytes, {available} available")]
    CorruptedLengthHeader { declared: u64, available: u64 },

    /// Primitive or random-source failure while encrypting.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Decrypted content does not match the digest recorded at upload.
    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },
}

impl CodecError {
    /// True for the "our format, but the content is damaged" family.
    ///
    /// Callers report these as "file corrupted or inaccessible", as opposed to
    /// `InvalidContainerFormat` which means "not an encrypted file at all".
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::DecryptionFailure
                | Self::CorruptedLengthHeader { .. }
                | Self::IntegrityMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corruption_family() {
        assert!(CodecError::DecryptionFailure.is_corruption());
        assert!(CodecError::CorruptedLengthHeader {
            declared: 10,
            available: 2
        }
        .is_corruption());
        assert!(!CodecError::InvalidContainerFormat("bad signature".into()).is_corruption());
        assert!(!CodecError::Configuration("missing".into()).is_corruption());
        assert!(!CodecError::Encryption("rng".into()).is_corruption());
    }

    #[test]
    fn test_display_messages() {
        let err = CodecError::CorruptedLengthHeader {
            declared: 100,
            available: 11,
        };
        assert_eq!(
            err.to_string(),
            "corrupted length header: needs 100 bytes, 11 available"
        );
    }
}
