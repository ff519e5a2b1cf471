/// Errors produced by key-value store operations.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    /// The backend could not serve the request.
    #[error("Store operation failed: {0}")]
    Backend(String),

    /// A bounded store call exceeded its deadline.
    #[error("Store operation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

pub type KvResult<T> = Result<T, KvError>;
