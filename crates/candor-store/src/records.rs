//! Durable persistence for finished structured records

use crate::StoreError;
use candor_domain::traits::RecordStore;
use candor_domain::{RedactedDocument, Run, StructuredRecord};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Write-once JSON persistence keyed by run identifier and timestamp
///
/// One record per run. The JSON is pretty-printed so records diff cleanly
/// under review. Redacted document copies are retained alongside the record
/// for audit; the raw source documents are never persisted here.
pub struct JsonRecordStore {
    output_dir: PathBuf,
}

impl JsonRecordStore {
    /// Create a store rooted at the given output directory
    ///
    /// The directory is created if it does not exist.
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Result<Self, StoreError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Path the record for this run would be written to
    pub fn record_path(&self, run: &Run) -> PathBuf {
        self.output_dir
            .join(format!("run-{}-{}.json", run.id, run.created_at))
    }

    /// Retain redacted document copies for audit, keyed by run identifier
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] on write failure; fatal for the audit
    /// trail but the caller may retry since redaction is deterministic.
    pub fn retain_redacted(
        &self,
        run: &Run,
        documents: &[RedactedDocument],
    ) -> Result<PathBuf, StoreError> {
        let dir = self.output_dir.join(format!("run-{}-redacted", run.id));
        fs::create_dir_all(&dir)?;

        for doc in documents {
            let path = dir.join(format!("{}.txt", doc.kind.as_str()));
            fs::write(&path, doc.text())?;
        }

        info!(
            "Retained {} redacted document(s) for run {} under {}",
            documents.len(),
            run.id,
            dir.display()
        );
        Ok(dir)
    }
}

impl RecordStore for JsonRecordStore {
    type Error = StoreError;

    fn persist(&self, run: &Run, record: &StructuredRecord) -> Result<PathBuf, Self::Error> {
        let path = self.record_path(run);
        if path.exists() {
            return Err(StoreError::AlreadyPersisted(run.id.to_string()));
        }

        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json)?;

        info!(
            "Persisted record for run {} ({} resolved, {} missing) to {}",
            run.id,
            record.resolved_count(),
            record.missing.len(),
            path.display()
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candor_domain::{
        DocumentContent, DocumentKind, FieldValue, Gender, Payload, ProgramType, PromptResult,
    };

    fn test_run() -> Run {
        Run::new("Jane Doe", "Alex Mercer", Gender::F, ProgramType::Mcp)
    }

    fn test_record(run: &Run) -> StructuredRecord {
        let mut payload = Payload::new();
        payload.insert("text".into(), FieldValue::Text("calm and curious".into()));
        StructuredRecord::assemble(
            run,
            vec![PromptResult {
                prompt_id: "first_impression".into(),
                raw_output: "calm and curious".into(),
                payload: Some(payload),
                attempts: 1,
                failure: None,
            }],
        )
    }

    #[test]
    fn test_persist_writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonRecordStore::new(dir.path()).unwrap();
        let run = test_run();

        let path = store.persist(&run, &test_record(&run)).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("first_impression"));
        // pretty-printed, not a single line
        assert!(contents.lines().count() > 1);
    }

    #[test]
    fn test_persist_is_write_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonRecordStore::new(dir.path()).unwrap();
        let run = test_run();
        let record = test_record(&run);

        store.persist(&run, &record).unwrap();
        let second = store.persist(&run, &record);
        assert!(matches!(second, Err(StoreError::AlreadyPersisted(_))));
    }

    #[test]
    fn test_record_path_is_keyed_by_run_and_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonRecordStore::new(dir.path()).unwrap();
        let run = test_run();

        let path = store.record_path(&run);
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.contains(&run.id.to_string()));
        assert!(name.contains(&run.created_at.to_string()));
    }

    #[test]
    fn test_retain_redacted_copies() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonRecordStore::new(dir.path()).unwrap();
        let run = test_run();

        let doc = RedactedDocument {
            kind: DocumentKind::AssessorNotes,
            content: DocumentContent::Text("[CANDIDATE] presented well".into()),
            spans: Vec::new(),
        };

        let out = store.retain_redacted(&run, &[doc]).unwrap();
        let copied = fs::read_to_string(out.join("assessor_notes.txt")).unwrap();
        assert!(copied.contains("[CANDIDATE]"));
    }
}
