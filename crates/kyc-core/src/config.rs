use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{KycError, KycResult};

/// Top-level configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    pub crypto: CryptoConfig,
    pub logging: LoggingConfig,
}

impl VaultConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file is not an error: defaults are returned and a warning is
    /// logged. A file that exists but does not parse is.
    pub fn load(path: &Path) -> KycResult<Self> {
        if !path.exists() {
            tracing::warn!("config file not found: {}  (using defaults)", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| KycError::Config(format!("parsing {}: {e}", path.display())))
    }

    pub fn from_toml(content: &str) -> KycResult<Self> {
        toml::from_str(content).map_err(|e| KycError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> KycResult<String> {
        toml::to_string_pretty(self).map_err(|e| KycError::Config(e.to_string()))
    }
}

/// File encryption configuration
///
/// The passphrase itself never lives here: only the name of the environment
/// variable that holds it, so the config file can be world-readable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// KDF salt. Changing it makes every existing container undecryptable.
    pub salt: String,
    /// Environment variable holding the secret passphrase
    pub passphrase_env: String,
    /// scrypt cost as log2(N) (default: 14, N = 16384)
    pub scrypt_log_n: u8,
    /// scrypt block size (default: 8)
    pub scrypt_r: u32,
    /// scrypt parallelism (default: 1)
    pub scrypt_p: u32,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            salt: "kyc-vault-file-salt-v1".into(),
            passphrase_env: "KYC_ENCRYPTION_SECRET".into(),
            scrypt_log_n: 14,
            scrypt_r: 8,
            scrypt_p: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (default: info)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}
