use forage_core::ForageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] ForageError),

    #[error("thread pool construction failed: {0}")]
    ThreadPool(String),
}

pub type SimResult<T> = Result<T, SimError>;
