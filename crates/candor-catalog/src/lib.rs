//! Candor Prompt Catalog
//!
//! The ordered, versioned set of prompt specifications driving extraction.
//! Each spec binds a prompt template to a target model, sampling
//! temperature, required redacted-document inputs, declared intra-run
//! dependencies, an expected output shape, and a retry budget with a repair
//! strategy.
//!
//! Read-only configuration data: `Catalog::for_program` is total over the
//! program enum, sequences never mutate, and the only caller-visible
//! failure mode — an unknown program string — is rejected where strings
//! enter the system, before a catalog is ever requested.

#![warn(missing_docs)]

mod builder;
mod catalog;
mod shape;
mod spec;

pub use builder::{PromptBuilder, FORMAT_CORRECTION};
pub use catalog::{Catalog, CATALOG_VERSION, MODEL_FLASH, MODEL_PRO};
pub use shape::{FieldSpec, FieldType, OutputShape, ShapeViolation};
pub use spec::{PromptId, PromptSpec, RepairStrategy};
