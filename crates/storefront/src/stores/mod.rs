//! Storage seams for accounts and durable records.
//!
//! Handlers and services talk to trait objects (`Arc<dyn AccountStore>`,
//! `Arc<dyn RecordStore>`), so tests can inject in-memory or failing
//! doubles. Production wiring uses [`MemoryAccountStore`] for the
//! account directory and [`JsonlRecordStore`] for orders, reviews, and
//! contact messages.

pub mod accounts;
pub mod records;

pub use accounts::{AccountStore, MemoryAccountStore};
pub use records::{JsonlRecordStore, MemoryRecordStore, RecordKind, RecordStore, StoredRecord};

use thiserror::Error;

/// Errors from store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique key already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Filesystem access failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A record failed to serialize or deserialize.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
