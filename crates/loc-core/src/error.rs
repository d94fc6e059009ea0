use thiserror::Error;

/// Top-level error type for the loc-core crate and dependents.
#[derive(Debug, Error)]
pub enum ReconError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("malformed record at line {line}: {detail}")]
    MalformedRecord { line: usize, detail: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, ReconError>;
