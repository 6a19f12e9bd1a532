use thiserror::Error;

pub type KycResult<T> = Result<T, KycError>;

#[derive(Debug, Error)]
pub enum KycError {
    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
