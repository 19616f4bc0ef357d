use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying record store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or refused the operation.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Human-readable description of the failure.
        message: String,
        /// The backend failure that caused this error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A persisted record could not be decoded back into an aggregate.
    #[error("corrupted record for session `{session_id}`")]
    Corrupted {
        /// Identifier of the affected session aggregate.
        session_id: uuid::Uuid,
        /// The decode failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a corrupted-record error from a decode failure.
    pub fn corrupted(session_id: uuid::Uuid, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Corrupted {
            session_id,
            source: Box::new(source),
        }
    }
}
