//! Error types for the likes repository.
//!
//! `DocumentStoreError` is what a storage backend reports; `LedgerError` is the
//! taxonomy the ledger store hands to its callers after mapping.

mod document_store_error;
mod ledger_error;

pub use document_store_error::DocumentStoreError;
pub use ledger_error::LedgerError;
