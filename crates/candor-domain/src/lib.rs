//! Candor Domain Layer
//!
//! This crate contains the core data model for the Candor assessment
//! pipeline. It defines the fundamental concepts, value objects, and trait
//! interfaces that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Run**: one assessment session, owning its identity and metadata
//! - **SourceDocument / RedactedDocument**: an uploaded artifact and its
//!   anonymized working copy, linked by document kind
//! - **Placeholder**: the fixed token that replaces a sensitive span
//! - **StructuredRecord**: the validated aggregate of extracted fields,
//!   consumed downstream to render the final report
//!
//! ## Architecture
//!
//! - Pure data model, no I/O
//! - Trait definitions for the model client and record store seams;
//!   infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod program;
pub mod record;
pub mod redaction;
pub mod run;
pub mod traits;

// Re-exports for convenience
pub use document::{DocumentContent, DocumentKind, SourceDocument};
pub use program::{Gender, ProgramType};
pub use record::{FieldValue, Payload, PromptResult, StructuredRecord};
pub use redaction::{PlaceholderKind, RedactedDocument, RedactionSpan};
pub use run::{Run, RunId};
