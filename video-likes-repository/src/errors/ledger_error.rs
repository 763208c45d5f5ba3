use thiserror::Error;

use super::DocumentStoreError;

/// Errors returned by the ledger store.
///
/// Every backend failure is mapped into one of these variants at the store
/// boundary, so callers never see a raw transport error. An unparseable ledger
/// is not an error: it is logged and read as an empty set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The video was deleted or never existed.
    #[error("Video not found: {0}")]
    NotFound(String),

    /// The store rejected the write on permission grounds. Not retried.
    #[error("Write forbidden: {0}")]
    Forbidden(String),

    /// The store does not recognize the ledger field.
    #[error("Schema mismatch: field `{0}` is not recognized by the store")]
    SchemaMismatch(String),

    /// The store could not be reached. Safe to retry.
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The request itself is malformed (empty or oversized identity, empty update).
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }

    /// Whether repeating the same call may succeed without any other change.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkUnavailable(_))
    }
}

impl From<DocumentStoreError> for LedgerError {
    fn from(err: DocumentStoreError) -> Self {
        match err {
            DocumentStoreError::NotFound(id) => Self::NotFound(id),
            DocumentStoreError::Forbidden(msg) => Self::Forbidden(msg),
            DocumentStoreError::SchemaMismatch { field } => Self::SchemaMismatch(field),
            DocumentStoreError::Network(msg) => Self::NetworkUnavailable(msg),
            DocumentStoreError::Unknown(msg) => Self::Unknown(msg),
        }
    }
}
