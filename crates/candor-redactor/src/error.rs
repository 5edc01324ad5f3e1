//! Error types for the Redactor

use candor_domain::DocumentKind;
use thiserror::Error;

/// Errors that can occur during redaction
#[derive(Error, Debug)]
pub enum RedactionError {
    /// The verification re-scan found a surviving sensitive span
    ///
    /// Terminal for the run; redaction is deterministic so retrying is
    /// meaningless. The offending document kind is reported so the caller
    /// can fix the source document.
    #[error("Redaction incomplete for {kind}: {detail}")]
    Incomplete {
        /// Which document failed verification
        kind: DocumentKind,
        /// What survived, by category
        detail: String,
    },

    /// The run metadata supplied no usable names to redact
    #[error("Redaction profile has no usable names")]
    EmptyProfile,
}
