//! # Video Likes Repository
//!
//! This crate provides the storage side of the like ledger. It includes the
//! abstract document store interface the ledger is written against, the error
//! taxonomy callers see, the size-bounded ledger codec with its eviction
//! policy, and an in-memory document store implementation.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod ledger;
pub mod locks;
pub mod memory;
pub mod service;

pub use config::LedgerStoreConfig;
pub use errors::{DocumentStoreError, LedgerError};
pub use interfaces::{DocumentStore, FieldMap};
pub use memory::InMemoryDocumentStore;
pub use service::LedgerStore;
