use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// Malformed or inconsistent input: bad weights, non-positive amounts,
    /// split sets that don't reconcile, membership violations.
    #[error("validation error: {0}")]
    ValidationError(String),
    /// A settlement was asked to leave a terminal state.
    #[error("invalid settlement transition: {0}")]
    InvalidStateTransition(String),
    #[error("not found: {0}")]
    NotFoundError(String),
}
