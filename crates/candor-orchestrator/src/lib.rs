//! Candor Extraction Orchestrator
//!
//! Drives the prompt catalog against redacted documents through the model
//! client and assembles the structured record.
//!
//! # Architecture
//!
//! ```text
//! RunRequest → validate → workspace → redact (hard gate) → orchestrate → persist
//! ```
//!
//! # Key behaviours
//!
//! - **Sequenced prompts**: the catalog's declared order, with earlier
//!   validated results fed to dependents as context
//! - **Retry with repair**: shape violations and timeouts retry within each
//!   spec's budget, with the spec's repair strategy adjusting the prompt
//! - **Independent failures**: one exhausted prompt never aborts the rest;
//!   the record carries an explicit missing-fields manifest instead
//! - **Cancellation**: cooperative checkpoints between dispatches; an
//!   in-flight call completes or times out and its result is discarded
//! - **Progress events**: each resolution is signalled over an optional
//!   channel rather than shared state
//!
//! # Example
//!
//! ```no_run
//! use candor_catalog::Catalog;
//! use candor_domain::{Gender, ProgramType, Run};
//! use candor_llm::MockClient;
//! use candor_orchestrator::{Orchestrator, OrchestratorConfig};
//! use std::collections::BTreeMap;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let run = Run::new("Jane Doe", "Alex Mercer", Gender::F, ProgramType::Mcp);
//! let catalog = Catalog::for_program(run.program);
//! let client = MockClient::new(r#"{"text": "ok"}"#);
//! let orchestrator = Orchestrator::new(client, OrchestratorConfig::default());
//!
//! let documents = BTreeMap::new(); // redacted documents, keyed by kind
//! let outcome = orchestrator.run(&run, catalog.specs(), &documents).await?;
//! println!("resolved {} prompts", outcome.record.resolved_count());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod orchestrator;
mod parser;
mod pipeline;
mod progress;


pub use config::OrchestratorConfig;
pub use error::PipelineError;
pub use orchestrator::{ExtractionOutcome, Orchestrator, RunStatus};
pub use pipeline::{DocumentUpload, Pipeline, RunReport, RunRequest};
pub use progress::{CancelToken, ProgressEvent, ProgressSender};
