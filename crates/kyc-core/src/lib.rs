pub mod config;
pub mod error;

pub use config::{CryptoConfig, LoggingConfig, VaultConfig};
pub use error::{KycError, KycResult};
