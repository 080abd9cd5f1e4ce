use thiserror::Error;

/// Core error type shared across docseed crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The schema definition violates internal invariants.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// A value could not be parsed (identifiers, literals).
    #[error("parse error: {0}")]
    Parse(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results returned by docseed crates.
pub type Result<T> = std::result::Result<T, Error>;
