//! Prompt specifications: the static unit of the catalog

use crate::shape::OutputShape;
use candor_domain::DocumentKind;
use std::fmt;

/// Identifier of one prompt spec, stable across catalog versions
///
/// Stable identifiers double as record field keys, so renaming one is a
/// breaking change for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PromptId(&'static str);

impl PromptId {
    /// Wrap a static identifier
    pub const fn new(id: &'static str) -> Self {
        Self(id)
    }

    /// The identifier string
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the prompt is adjusted when a retry is needed
///
/// Pluggable per spec rather than hard-coded correction text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairStrategy {
    /// Resend the prompt unchanged
    None,
    /// Append a fixed formatting-correction paragraph
    AppendFormatHint,
    /// Truncate the document context and append the correction
    TruncateAndRetry,
}

/// One prompt specification: declarative, versioned, read-only
#[derive(Debug, Clone)]
pub struct PromptSpec {
    /// Stable identifier; also the record field key
    pub id: PromptId,
    /// Position in the program's ordered sequence
    pub ordinal: usize,
    /// Target model identifier, resolved statically at catalog load
    pub model: String,
    /// Sampling temperature for this prompt
    pub temperature: f32,
    /// Redacted document kinds required as input
    pub inputs: Vec<DocumentKind>,
    /// Prompts whose validated results feed this one as context
    ///
    /// A failed dependency is passed through as a placeholder, never
    /// blocking this prompt.
    pub depends_on: Vec<PromptId>,
    /// Expected output shape
    pub shape: OutputShape,
    /// How many attempts this prompt may spend
    pub retry_budget: u32,
    /// How retries adjust the prompt
    pub repair: RepairStrategy,
    /// The instruction template
    pub template: &'static str,
}
