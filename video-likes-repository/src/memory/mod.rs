//! In-memory document store.
//!
//! Backs the ledger in tests and in the local simulation binary. It can be
//! restricted to a fixed set of recognized fields, switched to read-only, or
//! taken offline to exercise every failure the ledger store maps.

mod provider;

pub use provider::InMemoryDocumentStore;
