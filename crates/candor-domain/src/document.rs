//! Source documents: the uploaded artifacts a run is built from

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of an uploaded assessment document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Personality inventory report (page-structured)
    PersonalityReport,
    /// Cognitive capacity test results (page-structured)
    CognitiveResult,
    /// Free-text assessor notes
    AssessorNotes,
    /// Program/task description context, supplied for ICP runs only
    ProgramContext,
}

impl DocumentKind {
    /// Stable snake_case token used in requests, filenames, and records
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::PersonalityReport => "personality_report",
            DocumentKind::CognitiveResult => "cognitive_result",
            DocumentKind::AssessorNotes => "assessor_notes",
            DocumentKind::ProgramContext => "program_context",
        }
    }

    /// Human-readable label used when assembling prompt payloads
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::PersonalityReport => "Personality Report",
            DocumentKind::CognitiveResult => "Capacity Test Results",
            DocumentKind::AssessorNotes => "Assessment Notes",
            DocumentKind::ProgramContext => "Program Description",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "personality_report" => Ok(DocumentKind::PersonalityReport),
            "cognitive_result" => Ok(DocumentKind::CognitiveResult),
            "assessor_notes" => Ok(DocumentKind::AssessorNotes),
            "program_context" => Ok(DocumentKind::ProgramContext),
            other => Err(format!("Unknown document kind: {}", other)),
        }
    }
}

/// Document content in its original format
///
/// Page-structured documents keep one string per page so that redaction can
/// preserve page count and layout; free-text notes are a single block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", content = "content", rename_all = "snake_case")]
pub enum DocumentContent {
    /// Page-structured content, one entry per page
    Paged(Vec<String>),
    /// Plain free text
    Text(String),
}

impl DocumentContent {
    /// Number of pages, if page-structured
    pub fn page_count(&self) -> Option<usize> {
        match self {
            DocumentContent::Paged(pages) => Some(pages.len()),
            DocumentContent::Text(_) => None,
        }
    }

    /// Flatten to a single text block for prompt assembly
    pub fn flatten(&self) -> String {
        match self {
            DocumentContent::Paged(pages) => pages.join("\n"),
            DocumentContent::Text(text) => text.clone(),
        }
    }

    /// Total content length in bytes
    pub fn len(&self) -> usize {
        match self {
            DocumentContent::Paged(pages) => pages.iter().map(|p| p.len()).sum(),
            DocumentContent::Text(text) => text.len(),
        }
    }

    /// Whether the content is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One uploaded artifact, immutable once ingested
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    kind: DocumentKind,
    content: DocumentContent,
}

impl SourceDocument {
    /// Create a source document; only the document store should do this
    pub fn new(kind: DocumentKind, content: DocumentContent) -> Self {
        Self { kind, content }
    }

    /// The declared document kind
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// The raw content
    pub fn content(&self) -> &DocumentContent {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_string_round_trip() {
        for kind in [
            DocumentKind::PersonalityReport,
            DocumentKind::CognitiveResult,
            DocumentKind::AssessorNotes,
            DocumentKind::ProgramContext,
        ] {
            assert_eq!(kind.as_str().parse::<DocumentKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!("transcript".parse::<DocumentKind>().is_err());
    }

    #[test]
    fn test_paged_content_counts_pages() {
        let content = DocumentContent::Paged(vec!["one".into(), "two".into()]);
        assert_eq!(content.page_count(), Some(2));
        assert_eq!(content.flatten(), "one\ntwo");
    }

    #[test]
    fn test_text_content_has_no_pages() {
        let content = DocumentContent::Text("notes".into());
        assert_eq!(content.page_count(), None);
        assert_eq!(content.len(), 5);
    }

    #[test]
    fn test_content_serde_format_tag() {
        let content = DocumentContent::Text("hello".into());
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["format"], "text");
        assert_eq!(json["content"], "hello");
    }
}
