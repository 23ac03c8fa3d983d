use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A precondition of the optimizer was violated (non-positive size, negative kerf).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A dimension or piece string could not be parsed.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("invalid project file: {0}")]
    InvalidProject(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
