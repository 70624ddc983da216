use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum DomainError {
    #[error("validation failed for '{field}': {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("invalid post id: {0}")]
    InvalidId(String),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("lock wait timeout: {0}")]
    LockTimeout(String),

    #[error("unexpected domain error: {0}")]
    Unexpected(String),
}

impl DomainError {
    /// Transient lock contention in the store; the only error class worth retrying.
    pub(crate) fn is_lock_timeout(&self) -> bool {
        matches!(self, DomainError::LockTimeout(_))
    }
}

#[derive(Debug, Error)]
pub(crate) enum UploadError {
    #[error("invalid file format: {0}")]
    InvalidFormat(String),

    #[error("failed to save file")]
    Io(#[from] std::io::Error),
}
