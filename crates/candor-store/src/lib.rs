//! Candor Storage Layer
//!
//! Two storage concerns live here:
//!
//! - [`DocumentWorkspace`]: the per-run temporary workspace holding copies
//!   of uploaded source documents. A scoped resource — the backing
//!   directory is released on every exit path, including orchestrator
//!   failure, because release rides on `Drop`.
//! - [`JsonRecordStore`]: durable, human-diffable persistence of the
//!   finished structured record plus the redacted document copies retained
//!   for audit, keyed by run identity.
//!
//! Runs never share storage: each workspace is private to its run, so no
//! locking is needed beyond the workspace lifetime.

#![warn(missing_docs)]

mod records;
mod workspace;

pub use records::JsonRecordStore;
pub use workspace::DocumentWorkspace;

use candor_domain::DocumentKind;
use thiserror::Error;

/// Errors that can occur during storage operations
///
/// All variants are fatal for the run in progress. Persistence failures are
/// retryable by the caller because the record is immutable and re-derivable.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Workspace directory could not be created or released
    #[error("Workspace error: {0}")]
    Workspace(String),

    /// A document could not be written into the workspace
    #[error("Failed to write {kind} document: {source}")]
    DocumentWrite {
        /// Which document failed
        kind: DocumentKind,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Underlying I/O failure while persisting
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record serialization failure
    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A record for this run has already been written
    #[error("Record already persisted for run {0}")]
    AlreadyPersisted(String),
}
