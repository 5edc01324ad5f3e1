//! The end-to-end pipeline: request in, persisted record out

use crate::error::PipelineError;
use crate::orchestrator::{ExtractionOutcome, Orchestrator, RunStatus};
use candor_catalog::Catalog;
use candor_domain::traits::{ModelClient, RecordStore};
use candor_domain::{
    DocumentContent, DocumentKind, Gender, ProgramType, RedactedDocument, Run,
};
use candor_redactor::{RedactionProfile, Redactor};
use candor_store::{DocumentWorkspace, JsonRecordStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

/// One uploaded document in a run request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentUpload {
    /// Document kind token (see [`DocumentKind`])
    pub kind: String,
    /// Raw content in its original format
    #[serde(flatten)]
    pub content: DocumentContent,
}

/// The inbound run request, as the input-collection layer submits it
///
/// Program, gender, and document kinds arrive as strings; the pipeline
/// validates them before any workspace or AI activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    /// Candidate full name
    pub candidate_name: String,
    /// Assessor full name
    pub assessor_name: String,
    /// Gender token ("M"/"F")
    pub gender: String,
    /// Program token ("MCP"/"DATA"/"ICP"/"NEW")
    pub program: String,
    /// The uploaded documents
    pub documents: Vec<DocumentUpload>,
    /// AI credential, consumed by the caller to construct the model client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Everything a completed run hands back to the caller
#[derive(Debug)]
pub struct RunReport {
    /// The run's metadata
    pub run: Run,
    /// The assembled record and how the run ended
    pub outcome: ExtractionOutcome,
    /// Where the record was persisted; `None` for a cancelled run
    pub record_path: Option<PathBuf>,
    /// Where the redacted audit copies were retained
    pub redacted_path: Option<PathBuf>,
}

/// The pipeline wires validation, storage, redaction, and extraction
///
/// Each `execute` call is one isolated run: it owns its workspace, shares
/// no mutable state with concurrent runs, and releases the workspace on
/// every exit path.
pub struct Pipeline<C>
where
    C: ModelClient,
{
    orchestrator: Orchestrator<C>,
    records: JsonRecordStore,
    workspace_base: Option<PathBuf>,
}

impl<C> Pipeline<C>
where
    C: ModelClient + Send + Sync + 'static,
    C::Error: std::fmt::Display,
{
    /// Create a pipeline from an orchestrator and a record store
    pub fn new(orchestrator: Orchestrator<C>, records: JsonRecordStore) -> Self {
        Self {
            orchestrator,
            records,
            workspace_base: None,
        }
    }

    /// Root per-run workspaces under the given directory
    pub fn with_workspace_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.workspace_base = Some(base.into());
        self
    }

    /// Execute one run end to end
    ///
    /// Fail-fast validation happens before the workspace exists, so a bad
    /// request leaves nothing behind. Redaction is the hard gate: no
    /// document reaches the AI layer unless its verification re-scan
    /// passed. A cancelled run returns its partial record unpersisted.
    pub async fn execute(&self, request: RunRequest) -> Result<RunReport, PipelineError> {
        let (run, uploads) = validate_request(&request)?;
        let catalog = Catalog::for_program(run.program);

        info!(
            "Run {} accepted: program {}, {} document(s), catalog {}",
            run.id,
            run.program,
            uploads.len(),
            candor_catalog::CATALOG_VERSION
        );

        let mut workspace = DocumentWorkspace::open(&run, self.workspace_base.as_deref())
            .map_err(|source| PipelineError::Storage {
                run_id: run.id,
                source,
            })?;

        let redactor = Redactor::new(&RedactionProfile::from_run(&run)).map_err(|source| {
            PipelineError::Redaction {
                run_id: run.id,
                source,
            }
        })?;

        let mut redacted: BTreeMap<DocumentKind, RedactedDocument> = BTreeMap::new();
        for (kind, content) in uploads {
            let document =
                workspace
                    .ingest(kind, content)
                    .map_err(|source| PipelineError::Storage {
                        run_id: run.id,
                        source,
                    })?;
            let masked = redactor.redact(document).map_err(|source| {
                PipelineError::Redaction {
                    run_id: run.id,
                    source,
                }
            })?;
            redacted.insert(kind, masked);
        }

        let outcome = self
            .orchestrator
            .run(&run, catalog.specs(), &redacted)
            .await?;

        let (record_path, redacted_path) = match outcome.status {
            RunStatus::Completed => {
                let record_path =
                    self.records
                        .persist(&run, &outcome.record)
                        .map_err(|source| PipelineError::Storage {
                            run_id: run.id,
                            source,
                        })?;
                let audit: Vec<RedactedDocument> = redacted.into_values().collect();
                let redacted_path = self.records.retain_redacted(&run, &audit).map_err(
                    |source| PipelineError::Storage {
                        run_id: run.id,
                        source,
                    },
                )?;
                (Some(record_path), Some(redacted_path))
            }
            RunStatus::Cancelled => (None, None),
        };

        // workspace released here on every path above as well, via Drop
        workspace.cleanup().map_err(|source| PipelineError::Storage {
            run_id: run.id,
            source,
        })?;

        Ok(RunReport {
            run,
            outcome,
            record_path,
            redacted_path,
        })
    }
}

/// Validate the inbound request before any workspace or AI activity
fn validate_request(
    request: &RunRequest,
) -> Result<(Run, Vec<(DocumentKind, DocumentContent)>), PipelineError> {
    let program: ProgramType = request
        .program
        .parse()
        .map_err(PipelineError::Configuration)?;
    let gender: Gender = request
        .gender
        .parse()
        .map_err(PipelineError::Configuration)?;

    if request.candidate_name.trim().is_empty() {
        return Err(PipelineError::Configuration(
            "candidate name must not be blank".to_string(),
        ));
    }
    if request.assessor_name.trim().is_empty() {
        return Err(PipelineError::Configuration(
            "assessor name must not be blank".to_string(),
        ));
    }

    let mut uploads: Vec<(DocumentKind, DocumentContent)> = Vec::new();
    for upload in &request.documents {
        let kind: DocumentKind = upload
            .kind
            .parse()
            .map_err(PipelineError::Configuration)?;
        if uploads.iter().any(|(k, _)| *k == kind) {
            return Err(PipelineError::Configuration(format!(
                "duplicate document kind: {}",
                kind
            )));
        }
        uploads.push((kind, upload.content.clone()));
    }

    for required in program.required_kinds() {
        if !uploads.iter().any(|(k, _)| k == required) {
            return Err(PipelineError::Configuration(format!(
                "missing required document kind {} for program {}",
                required, program
            )));
        }
    }

    let run = Run::new(
        request.candidate_name.trim(),
        request.assessor_name.trim(),
        gender,
        program,
    );
    Ok((run, uploads))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with(program: &str, kinds: &[&str]) -> RunRequest {
        RunRequest {
            candidate_name: "Jane Doe".into(),
            assessor_name: "Alex Mercer".into(),
            gender: "F".into(),
            program: program.into(),
            documents: kinds
                .iter()
                .map(|k| DocumentUpload {
                    kind: k.to_string(),
                    content: DocumentContent::Text("body".into()),
                })
                .collect(),
            api_key: None,
        }
    }

    const FULL_SET: &[&str] = &["personality_report", "cognitive_result", "assessor_notes"];

    #[test]
    fn test_valid_request_yields_a_run() {
        let (run, uploads) = validate_request(&request_with("MCP", FULL_SET)).unwrap();
        assert_eq!(run.program, ProgramType::Mcp);
        assert_eq!(uploads.len(), 3);
    }

    #[test]
    fn test_unknown_program_is_a_configuration_error() {
        let err = validate_request(&request_with("MNGT", FULL_SET)).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }

    #[test]
    fn test_unknown_document_kind_is_rejected() {
        let err = validate_request(&request_with("MCP", &["transcript"])).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }

    #[test]
    fn test_missing_required_kind_is_rejected() {
        let err =
            validate_request(&request_with("MCP", &["assessor_notes"])).unwrap_err();
        match err {
            PipelineError::Configuration(msg) => {
                assert!(msg.contains("personality_report"))
            }
            other => panic!("expected Configuration, got {:?}", other),
        }
    }

    #[test]
    fn test_icp_requires_program_context() {
        let err = validate_request(&request_with("ICP", FULL_SET)).unwrap_err();
        match err {
            PipelineError::Configuration(msg) => assert!(msg.contains("program_context")),
            other => panic!("expected Configuration, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_kind_is_rejected() {
        let err = validate_request(&request_with(
            "MCP",
            &["assessor_notes", "assessor_notes"],
        ))
        .unwrap_err();
        match err {
            PipelineError::Configuration(msg) => assert!(msg.contains("duplicate")),
            other => panic!("expected Configuration, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_candidate_name_is_rejected() {
        let mut request = request_with("MCP", FULL_SET);
        request.candidate_name = "  ".into();
        assert!(matches!(
            validate_request(&request),
            Err(PipelineError::Configuration(_))
        ));
    }

    #[test]
    fn test_request_round_trips_through_json() {
        let request = request_with("DATA", FULL_SET);
        let json = serde_json::to_string(&request).unwrap();
        let parsed: RunRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.program, "DATA");
        assert_eq!(parsed.documents.len(), 3);
    }
}
