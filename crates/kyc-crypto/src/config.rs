//! Process-wide encryption configuration
//!
//! Built once at startup, then handed to [`FileCodec`](crate::FileCodec).
//! Construction runs the KDF, so a missing or empty secret fails here rather
//! than on the first upload.

use secrecy::SecretString;

use crate::error::{CodecError, CodecResult};
use crate::kdf::{derive_key, DerivedKey, KdfParams};
use crate::ALGORITHM;

/// Immutable key material for the codec.
#[derive(Debug, Clone)]
pub struct EncryptionConfig {
    key: DerivedKey,
}

impl EncryptionConfig {
    /// Derive the key from a passphrase and the deployment salt.
    pub fn new(passphrase: &SecretString, salt: &str, params: &KdfParams) -> CodecResult<Self> {
        let key = derive_key(passphrase, salt.as_bytes(), params)?;
        Ok(Self { key })
    }

    /// Read the passphrase from the environment variable named in the config.
    ///
    /// There is no fallback secret: an unset or empty variable is a
    /// configuration error.
    pub fn from_env(config: &kyc_core::CryptoConfig) -> CodecResult<Self> {
        let var = &config.passphrase_env;
        let passphrase = match std::env::var(var) {
            Ok(value) if !value.is_empty() => SecretString::from(value),
            Ok(_) => {
                return Err(CodecError::Configuration(format!(
                    "environment variable {var} is empty"
                )))
            }
            Err(std::env::VarError::NotPresent) => {
                return Err(CodecError::Configuration(format!(
                    "environment variable {var} is not set"
                )))
            }
            Err(std::env::VarError::NotUnicode(_)) => {
                return Err(CodecError::Configuration(format!(
                    "environment variable {var} is not valid UTF-8"
                )))
            }
        };

        Self::new(&passphrase, &config.salt, &KdfParams::from(config))
    }

    /// Wrap an already-derived key (tests, key escrow tooling).
    pub fn from_key(key: DerivedKey) -> Self {
        Self { key }
    }

    pub fn key(&self) -> &DerivedKey {
        &self.key
    }

    pub fn algorithm(&self) -> &'static str {
        ALGORITHM
    }
}
