use thiserror::Error;

/// Failures at the document store boundary. Query and write failures are
/// treated alike by the refresh stages.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid document path: {0}")]
    InvalidPath(String),

    #[error("timestamp out of range: {0}")]
    OutOfRange(String),

    #[error("invalid document {collection}/{id}: {reason}")]
    InvalidDocument {
        collection: String,
        id: String,
        reason: String,
    },
}

impl StoreError {
    pub fn invalid_path<T: std::fmt::Display>(msg: T) -> Self {
        StoreError::InvalidPath(msg.to_string())
    }
}
