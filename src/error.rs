use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid model: {0}")]
    InvalidModel(#[from] serde_json::Error),
    #[error("empty dataset")]
    EmptyDataset,
    #[error("invalid interpolation weights ({0}, {1}): must be non-negative and sum to 1")]
    InvalidLambdas(f64, f64),
    #[error("invalid line {lineno}: {line:?}")]
    InvalidLine { lineno: usize, line: String },
    #[error("id {0:?} missing from one of the inputs")]
    IdMismatch(String),
}
