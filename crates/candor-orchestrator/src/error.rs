//! Error types for the extraction pipeline

use candor_domain::RunId;
use candor_redactor::RedactionError;
use candor_store::StoreError;
use thiserror::Error;

/// Run-level errors
///
/// Per-prompt validation and timeout failures are not here: they retry
/// within each spec's budget and surface only in the record's
/// missing-fields manifest.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Bad or missing input: unknown program or document kind, blank names,
    /// or a required document kind absent for the chosen program
    ///
    /// Reported before any workspace or AI activity; nothing is retried
    /// and no partial work is left behind.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Workspace or persistence I/O failure; fatal for the run
    #[error("Storage error for run {run_id}: {source}")]
    Storage {
        /// The run that failed
        run_id: RunId,
        /// The underlying storage failure
        #[source]
        source: StoreError,
    },

    /// The redaction gate failed; the run aborted before any AI exposure
    ///
    /// The source error names the offending document kind so the caller
    /// can fix the source document. Deterministic, so never retried.
    #[error("Redaction failed for run {run_id}: {source}")]
    Redaction {
        /// The run that failed
        run_id: RunId,
        /// The verification failure, carrying the document kind
        #[source]
        source: RedactionError,
    },

    /// Every prompt in the catalog failed terminally
    ///
    /// Partial success never raises this; a record with a missing-fields
    /// manifest is considered more valuable than no record.
    #[error("Extraction produced no usable fields for run {0}")]
    ExtractionFailed(RunId),
}
