//! Interface definitions for the document store.
//!
//! This module defines the abstract `DocumentStore` trait that the ledger
//! store is written against, so that backend selection stays a configuration
//! concern outside the ledger.

mod document_store;

pub use document_store::{DocumentStore, FieldMap};
