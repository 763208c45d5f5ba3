use thiserror::Error;

/// Errors reported by a `DocumentStore` backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentStoreError {
    /// The record does not exist.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// The backend refused the operation on permission grounds.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The backend does not recognize a field.
    #[error("Unknown attribute: {field}")]
    SchemaMismatch { field: String },

    /// The backend could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl DocumentStoreError {
    pub fn not_found(item_id: &str) -> Self {
        Self::NotFound(item_id.to_string())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn schema_mismatch(field: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            field: field.into(),
        }
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }

    /// The unrecognized field, if this is a schema mismatch.
    pub fn mismatched_field(&self) -> Option<&str> {
        match self {
            Self::SchemaMismatch { field } => Some(field),
            _ => None,
        }
    }
}
