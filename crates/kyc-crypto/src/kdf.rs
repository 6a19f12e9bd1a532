//! Key derivation: scrypt passphrase + salt → 256-bit file key

use scrypt::Params;
use secrecy::{ExposeSecret, SecretString};
use std::time::Instant;
use zeroize::Zeroize;

use crate::error::{CodecError, CodecResult};
use crate::KEY_SIZE;

/// The 256-bit AES key every container is encrypted under.
///
/// Zeroized on drop to prevent secrets lingering in memory.
#[derive(Clone)]
pub struct DerivedKey {
    bytes: [u8; KEY_SIZE],
}

impl DerivedKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// scrypt cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// log2 of the CPU/memory cost N (default: 14)
    pub log_n: u8,
    /// Block size (default: 8)
    pub r: u32,
    /// Parallelism (default: 1)
    pub p: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            log_n: 14,
            r: 8,
            p: 1,
        }
    }
}

impl From<&kyc_core::CryptoConfig> for KdfParams {
    fn from(config: &kyc_core::CryptoConfig) -> Self {
        Self {
            log_n: config.scrypt_log_n,
            r: config.scrypt_r,
            p: config.scrypt_p,
        }
    }
}

impl KdfParams {
    fn to_scrypt(self) -> CodecResult<Params> {
        if self.log_n == 0 || self.log_n >= 32 || self.r == 0 || self.p == 0 {
            return Err(CodecError::Configuration(format!(
                "invalid scrypt params: log_n={} r={} p={}",
                self.log_n, self.r, self.p
            )));
        }
        Params::new(self.log_n, self.r, self.p, KEY_SIZE)
            .map_err(|e| CodecError::Configuration(format!("invalid scrypt params: {e}")))
    }
}

/// Derive the 256-bit file key from a passphrase and salt using scrypt.
///
/// Deterministic: the same passphrase, salt and params always give the same
/// key, which is what lets a later process decrypt earlier containers.
/// Deliberately slow; call once per process.
pub fn derive_key(
    passphrase: &SecretString,
    salt: &[u8],
    params: &KdfParams,
) -> CodecResult<DerivedKey> {
    if passphrase.expose_secret().is_empty() {
        return Err(CodecError::Configuration("passphrase is empty".into()));
    }
    if salt.is_empty() {
        return Err(CodecError::Configuration("salt is empty".into()));
    }

    let scrypt_params = params.to_scrypt()?;
    let started = Instant::now();

    let mut key = [0u8; KEY_SIZE];
    scrypt::scrypt(
        passphrase.expose_secret().as_bytes(),
        salt,
        &scrypt_params,
        &mut key,
    )
    .map_err(|e| CodecError::Configuration(format!("scrypt KDF failed: {e}")))?;

    tracing::debug!(
        log_n = params.log_n,
        r = params.r,
        p = params.p,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "derived file encryption key"
    );

    Ok(DerivedKey::from_bytes(key))
}
