//! Per-run temporary workspace for uploaded documents

use crate::StoreError;
use candor_domain::{DocumentContent, DocumentKind, Run, RunId, SourceDocument};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// A scoped per-run workspace holding copies of the uploaded documents
///
/// The backing directory is created under the given base directory (or the
/// system temp dir) and removed when the workspace is dropped, on every exit
/// path. Each run owns exactly one workspace; workspaces are never shared.
pub struct DocumentWorkspace {
    run_id: RunId,
    dir: TempDir,
    documents: Vec<SourceDocument>,
}

impl DocumentWorkspace {
    /// Open a fresh workspace for the given run
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Workspace`] if the directory cannot be created
    /// (disk full, permission denied). Fatal for the run.
    pub fn open(run: &Run, base_dir: Option<&Path>) -> Result<Self, StoreError> {
        let prefix = format!("candor-run-{}-", run.id);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);

        let dir = match base_dir {
            Some(base) => {
                fs::create_dir_all(base)?;
                builder.tempdir_in(base)
            }
            None => builder.tempdir(),
        }
        .map_err(|e| StoreError::Workspace(format!("cannot create workspace: {}", e)))?;

        info!("Opened workspace for run {} at {}", run.id, dir.path().display());

        Ok(Self {
            run_id: run.id,
            dir,
            documents: Vec::new(),
        })
    }

    /// Ingest one uploaded document into the workspace
    ///
    /// Writes an audit copy into the workspace directory and returns the
    /// immutable [`SourceDocument`]. Ingesting the same kind twice replaces
    /// the earlier copy.
    pub fn ingest(
        &mut self,
        kind: DocumentKind,
        content: DocumentContent,
    ) -> Result<&SourceDocument, StoreError> {
        let path = self.document_path(kind);
        fs::write(&path, content.flatten())
            .map_err(|source| StoreError::DocumentWrite { kind, source })?;

        debug!(
            "Ingested {} ({} bytes) into workspace for run {}",
            kind,
            content.len(),
            self.run_id
        );

        let document = SourceDocument::new(kind, content);
        self.documents.retain(|d| d.kind() != kind);
        self.documents.push(document);

        // retain() plus push() guarantees the kind is present and last
        Ok(self
            .documents
            .last()
            .ok_or_else(|| StoreError::Workspace("ingest lost its document".into()))?)
    }

    /// The run this workspace belongs to
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Filesystem path of the workspace directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// All documents ingested so far, in ingestion order
    pub fn documents(&self) -> &[SourceDocument] {
        &self.documents
    }

    /// Look up an ingested document by kind
    pub fn document(&self, kind: DocumentKind) -> Option<&SourceDocument> {
        self.documents.iter().find(|d| d.kind() == kind)
    }

    /// Release the workspace eagerly instead of waiting for `Drop`
    pub fn cleanup(self) -> Result<(), StoreError> {
        let path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .map_err(|e| StoreError::Workspace(format!("cannot release workspace: {}", e)))?;
        debug!("Released workspace at {}", path.display());
        Ok(())
    }

    fn document_path(&self, kind: DocumentKind) -> PathBuf {
        self.dir.path().join(format!("{}.txt", kind.as_str()))
    }
}
