//! Redacted documents and the audit trail of masked spans

use crate::document::{DocumentContent, DocumentKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What category of sensitive data a placeholder stands in for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKind {
    /// The candidate's name or a declared alias
    CandidateName,
    /// The assessor's name or a declared alias
    AssessorName,
    /// An e-mail address
    Email,
    /// A phone number
    Phone,
    /// A birth date
    BirthDate,
    /// A street address (label-zone match on paged documents)
    Address,
    /// A national identifier or other long numeric identifier
    NationalId,
    /// A personal web or social-media link
    WebLink,
}

impl PlaceholderKind {
    /// The fixed token substituted into redacted content
    ///
    /// Tokens are stable across runs so redaction stays deterministic and
    /// downstream prompts can refer to the candidate generically.
    pub fn token(&self) -> &'static str {
        match self {
            PlaceholderKind::CandidateName => "[CANDIDATE]",
            PlaceholderKind::AssessorName => "[ASSESSOR]",
            PlaceholderKind::Email => "[EMAIL]",
            PlaceholderKind::Phone => "[PHONE]",
            PlaceholderKind::BirthDate => "[BIRTH-DATE]",
            PlaceholderKind::Address => "[ADDRESS]",
            PlaceholderKind::NationalId => "[ID]",
            PlaceholderKind::WebLink => "[LINK]",
        }
    }
}

impl fmt::Display for PlaceholderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// One masked region, recorded for auditability
///
/// Offsets are byte positions into the content as it stood when the span was
/// masked, relative to the page for paged documents and to the whole text
/// otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionSpan {
    /// Zero-based page index for paged documents
    pub page: Option<usize>,
    /// Byte offset where the masked region started
    pub start: usize,
    /// Byte offset one past the end of the masked region
    pub end: usize,
    /// What the region was replaced with
    pub placeholder: PlaceholderKind,
}

/// The anonymized working copy of exactly one source document
///
/// Invariant (checked by the redactor, not assumed): no substring matching a
/// known sensitive-field pattern survives in `content`.
#[derive(Debug, Clone, PartialEq)]
pub struct RedactedDocument {
    /// Same kind as the source document it derives from
    pub kind: DocumentKind,
    /// Content with sensitive spans replaced by placeholder tokens
    pub content: DocumentContent,
    /// Audit trail of every masked span
    pub spans: Vec<RedactionSpan>,
}

impl RedactedDocument {
    /// Flattened text used when assembling prompt payloads
    pub fn text(&self) -> String {
        self.content.flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_bracketed() {
        for kind in [
            PlaceholderKind::CandidateName,
            PlaceholderKind::AssessorName,
            PlaceholderKind::Email,
            PlaceholderKind::Phone,
            PlaceholderKind::BirthDate,
            PlaceholderKind::Address,
            PlaceholderKind::NationalId,
            PlaceholderKind::WebLink,
        ] {
            let token = kind.token();
            assert!(token.starts_with('[') && token.ends_with(']'));
        }
    }
}
