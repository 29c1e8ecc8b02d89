use thiserror::Error;

/// Errors surfaced by [`crate::store::MessageStore`] mutations.
///
/// Reads never fail: a missing or corrupt backing file is an empty window.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No stored message carries the requested id.
    #[error("message '{0}' not found")]
    NotFound(String),

    /// The backing file could not be written or replaced.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The window could not be serialised.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
