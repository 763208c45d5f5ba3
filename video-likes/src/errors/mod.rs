//! Error types for the like button and the simulation binary.

use std::fmt;

use thiserror::Error;
use video_likes_repository::LedgerError;

/// Why the store refused a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The video was deleted; the page is stale.
    ItemNotFound,
    /// Permissions on the store are misconfigured.
    Forbidden,
    /// The store has no like ledger field.
    SchemaMismatch,
    /// The request was malformed.
    Invalid,
    Unknown,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let notice = match self {
            RejectReason::ItemNotFound => "video not found, refresh the page",
            RejectReason::Forbidden => "likes are not permitted, this is a configuration error",
            RejectReason::SchemaMismatch => "likes are not set up for this video",
            RejectReason::Invalid => "the like request was invalid",
            RejectReason::Unknown => "the like could not be saved",
        };
        f.write_str(notice)
    }
}

/// Failure shown next to the like button.
///
/// The three classes are distinguished because the user can act on them
/// differently: sign in, reload or report, or simply try again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorState {
    /// No identity was available, so no toggle was attempted.
    #[error("Sign in to like videos")]
    NotAuthenticated,

    /// The toggle reached the store and was refused.
    #[error("Like rejected: {0}")]
    WriteRejected(RejectReason),

    /// The store could not be reached.
    #[error("Network unreachable, try again")]
    NetworkUnreachable,
}

impl ErrorState {
    /// Whether offering a retry makes sense.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkUnreachable)
    }
}

impl From<&LedgerError> for ErrorState {
    fn from(err: &LedgerError) -> Self {
        match err {
            LedgerError::NotFound(_) => Self::WriteRejected(RejectReason::ItemNotFound),
            LedgerError::Forbidden(_) => Self::WriteRejected(RejectReason::Forbidden),
            LedgerError::SchemaMismatch(_) => Self::WriteRejected(RejectReason::SchemaMismatch),
            LedgerError::Validation(_) => Self::WriteRejected(RejectReason::Invalid),
            LedgerError::Unknown(_) => Self::WriteRejected(RejectReason::Unknown),
            LedgerError::NetworkUnavailable(_) => Self::NetworkUnreachable,
        }
    }
}

/// Errors that can occur during simulation setup or execution.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ledger store error.
    #[error("Ledger error: {0}")]
    LedgerError(#[from] LedgerError),

    /// A simulated client task panicked or was cancelled.
    #[error("Task error: {0}")]
    TaskError(String),

    /// The stored like count differs from the confirmed toggles.
    #[error("Like count mismatch: expected {expected}, store holds {actual}")]
    CountMismatch { expected: u64, actual: u64 },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
