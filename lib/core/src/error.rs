use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Need at least {need} candidates to fit, have {have}")]
    InsufficientData { have: usize, need: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Weights must sum to a positive value")]
    InvalidWeights,

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Model not found: {0}")]
    NotFound(String),

    #[error("Corrupt model: {0}")]
    CorruptModel(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
