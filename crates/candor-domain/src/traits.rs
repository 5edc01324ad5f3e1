//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. Implementations live in other crates: the model client
//! in `candor-llm`, the record store in `candor-store`.

use crate::record::StructuredRecord;
use crate::run::Run;
use std::path::PathBuf;

/// One outbound model call: everything the AI layer is allowed to see
///
/// Assembled exclusively from redacted document content; raw source
/// documents never reach this type.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    /// Target model identifier (static per prompt spec)
    pub model: String,
    /// Assembled prompt payload
    pub prompt: String,
    /// Sampling temperature for this prompt
    pub temperature: f32,
    /// Short description of the expected output shape
    pub shape_hint: String,
}

/// Trait for AI model operations
///
/// The call is synchronous; callers that must not block invoke it through
/// `tokio::task::spawn_blocking` with a timeout.
pub trait ModelClient {
    /// Error type for model operations
    type Error;

    /// Generate raw text for the given request
    fn generate(&self, request: &ModelRequest) -> Result<String, Self::Error>;
}

/// Trait for persisting finished structured records
pub trait RecordStore {
    /// Error type for store operations
    type Error;

    /// Persist the record, returning its durable location
    ///
    /// Records are written once; persisting the same run twice is an error.
    fn persist(&self, run: &Run, record: &StructuredRecord) -> Result<PathBuf, Self::Error>;
}
