//! The extraction state machine

use crate::config::OrchestratorConfig;
use crate::error::PipelineError;
use crate::parser::parse_payload;
use crate::progress::{CancelToken, ProgressEvent, ProgressSender};
use candor_catalog::{PromptBuilder, PromptSpec};
use candor_domain::traits::{ModelClient, ModelRequest};
use candor_domain::{
    DocumentKind, Payload, PromptResult, RedactedDocument, Run, StructuredRecord,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every prompt was resolved (successfully or terminally)
    Completed,
    /// The run was cancelled between prompt dispatches
    Cancelled,
}

/// The assembled record plus how the run ended
///
/// A cancelled outcome carries the partial record for inspection; the
/// pipeline never persists it.
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    /// The assembled structured record
    pub record: StructuredRecord,
    /// Completed or cancelled
    pub status: RunStatus,
}

/// The Orchestrator drives the prompt sequence against redacted documents
///
/// Prompts resolve independently: an exhausted retry budget records a
/// terminal per-prompt failure and the sequence continues, because each
/// prompt maps to an independent report section.
pub struct Orchestrator<C>
where
    C: ModelClient,
{
    client: Arc<C>,
    config: OrchestratorConfig,
    progress: Option<ProgressSender>,
    cancel: CancelToken,
}

impl<C> Orchestrator<C>
where
    C: ModelClient + Send + Sync + 'static,
    C::Error: std::fmt::Display,
{
    /// Create a new Orchestrator
    pub fn new(client: C, config: OrchestratorConfig) -> Self {
        Self {
            client: Arc::new(client),
            config,
            progress: None,
            cancel: CancelToken::new(),
        }
    }

    /// Attach a progress event channel
    pub fn with_progress(mut self, progress: ProgressSender) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Use an externally held cancellation token
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// A token that cancels this orchestrator's runs
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Resolve the ordered prompt sequence and assemble the record
    ///
    /// Only redacted documents enter here; the payload of every outbound
    /// call is assembled from their text exclusively.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ExtractionFailed`] when every prompt failed
    /// terminally. Partial success is not an error.
    pub async fn run(
        &self,
        run: &Run,
        specs: &[PromptSpec],
        documents: &BTreeMap<DocumentKind, RedactedDocument>,
    ) -> Result<ExtractionOutcome, PipelineError> {
        info!(
            "Starting extraction for run {} ({} prompts, program {})",
            run.id,
            specs.len(),
            run.program
        );
        self.emit(ProgressEvent::RunStarted {
            run_id: run.id,
            total_prompts: specs.len(),
        });

        let mut results: Vec<PromptResult> = Vec::new();
        let mut resolved_context: BTreeMap<String, Option<Payload>> = BTreeMap::new();
        let mut cancelled = false;

        for spec in specs {
            // cooperative checkpoint between dispatches
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let result = self.resolve_spec(spec, documents, &resolved_context).await;

            // a call that was in flight when cancellation fired is discarded
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            self.emit(ProgressEvent::PromptResolved {
                prompt_id: result.prompt_id.clone(),
                success: result.is_resolved(),
            });
            resolved_context.insert(result.prompt_id.clone(), result.payload.clone());
            results.push(result);
        }

        let record = StructuredRecord::assemble(run, results);
        let resolved = record.resolved_count();
        let failed = record.missing.len();

        self.emit(ProgressEvent::RunFinished {
            run_id: run.id,
            resolved,
            failed,
        });

        if cancelled {
            info!(
                "Run {} cancelled after {} resolved prompt(s)",
                run.id, resolved
            );
            return Ok(ExtractionOutcome {
                record,
                status: RunStatus::Cancelled,
            });
        }

        if resolved == 0 && !specs.is_empty() {
            warn!("Run {}: every prompt failed", run.id);
            return Err(PipelineError::ExtractionFailed(run.id));
        }

        info!(
            "Extraction complete for run {}: {} resolved, {} missing",
            run.id, resolved, failed
        );
        Ok(ExtractionOutcome {
            record,
            status: RunStatus::Completed,
        })
    }

    /// Resolve one spec within its retry budget
    async fn resolve_spec(
        &self,
        spec: &PromptSpec,
        documents: &BTreeMap<DocumentKind, RedactedDocument>,
        context: &BTreeMap<String, Option<Payload>>,
    ) -> PromptResult {
        let mut builder = PromptBuilder::new(spec);
        for kind in &spec.inputs {
            match documents.get(kind) {
                Some(doc) => builder = builder.with_document(*kind, doc.text()),
                None => {
                    // the pipeline validates inputs up front, so this only
                    // fires when the orchestrator is driven directly
                    return failed_result(spec, 0, String::new(), format!(
                        "missing input document: {}",
                        kind
                    ));
                }
            }
        }
        for dep in &spec.depends_on {
            let payload = context.get(dep.as_str()).and_then(|p| p.as_ref());
            builder = builder.with_dependency(*dep, payload);
        }

        let mut last_raw = String::new();
        let mut last_failure = String::new();

        for attempt in 1..=spec.retry_budget {
            if attempt > 1 && self.config.retry_delay_ms > 0 {
                tokio::time::sleep(self.config.retry_delay()).await;
            }

            self.emit(ProgressEvent::PromptStarted {
                prompt_id: spec.id.to_string(),
                attempt,
            });

            let prompt = builder.build_for_attempt(attempt);
            if prompt.len() > self.config.max_prompt_chars {
                warn!(
                    "Prompt {} attempt {} exceeds {} chars",
                    spec.id, attempt, self.config.max_prompt_chars
                );
                last_failure = format!(
                    "assembled prompt exceeds {} characters",
                    self.config.max_prompt_chars
                );
                continue;
            }

            let request = ModelRequest {
                model: spec.model.clone(),
                prompt,
                temperature: spec.temperature,
                shape_hint: spec.shape.hint(),
            };

            match self.dispatch(request).await {
                Ok(raw) => {
                    debug!(
                        "Prompt {} attempt {} returned {} chars",
                        spec.id,
                        attempt,
                        raw.len()
                    );
                    last_raw = raw;
                    match parse_payload(&last_raw, &spec.shape) {
                        Ok(payload) => {
                            return PromptResult {
                                prompt_id: spec.id.to_string(),
                                raw_output: last_raw,
                                payload: Some(payload),
                                attempts: attempt,
                                failure: None,
                            };
                        }
                        Err(reason) => {
                            warn!(
                                "Prompt {} attempt {} failed validation: {}",
                                spec.id, attempt, reason
                            );
                            last_failure = reason;
                        }
                    }
                }
                Err(reason) => {
                    // timeouts and transport errors spend the budget like
                    // validation failures
                    warn!("Prompt {} attempt {} failed: {}", spec.id, attempt, reason);
                    last_failure = reason;
                }
            }
        }

        failed_result(spec, spec.retry_budget, last_raw, last_failure)
    }

    /// One outbound model call with a bounded timeout
    ///
    /// The client trait is synchronous, so the call runs on the blocking
    /// pool; no responsiveness-owning thread ever waits on the network.
    async fn dispatch(&self, request: ModelRequest) -> Result<String, String> {
        let client = Arc::clone(&self.client);
        let call =
            tokio::task::spawn_blocking(move || client.generate(&request).map_err(|e| e.to_string()));

        match timeout(self.config.call_timeout(), call).await {
            Err(_) => Err(format!(
                "model call timed out after {}s",
                self.config.call_timeout_secs
            )),
            Ok(Err(join)) => Err(format!("task join error: {}", join)),
            Ok(Ok(result)) => result,
        }
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(progress) = &self.progress {
            // a departed observer must never stall extraction
            let _ = progress.send(event);
        }
    }
}

fn failed_result(spec: &PromptSpec, attempts: u32, raw: String, failure: String) -> PromptResult {
    PromptResult {
        prompt_id: spec.id.to_string(),
        raw_output: raw,
        payload: None,
        attempts,
        failure: Some(failure),
    }
}
