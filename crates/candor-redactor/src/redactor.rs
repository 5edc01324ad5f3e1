//! Kind-specific masking and the verification gate

use crate::error::RedactionError;
use crate::patterns::{identifier_patterns, name_pattern, MaskPattern, LABEL_ZONES};
use crate::profile::RedactionProfile;
use candor_domain::{
    DocumentContent, DocumentKind, PlaceholderKind, RedactedDocument, RedactionSpan,
    SourceDocument,
};
use tracing::{debug, info};

/// The Redactor produces anonymized working copies of source documents
///
/// All patterns are compiled once at construction from the run's redaction
/// profile; `redact` is then a pure function of the document content, so
/// redacting the same document twice yields byte-identical output.
#[derive(Debug)]
pub struct Redactor {
    name_masks: Vec<MaskPattern>,
    identifier_masks: Vec<MaskPattern>,
}

impl Redactor {
    /// Build a redactor for one run's profile
    ///
    /// # Errors
    ///
    /// Returns [`RedactionError::EmptyProfile`] when the profile carries no
    /// names at all — a run without names cannot be meaningfully anonymized.
    pub fn new(profile: &RedactionProfile) -> Result<Self, RedactionError> {
        if profile.is_empty() {
            return Err(RedactionError::EmptyProfile);
        }

        let name_masks = [
            name_pattern(&profile.candidate_terms(), PlaceholderKind::CandidateName),
            name_pattern(&profile.assessor_terms(), PlaceholderKind::AssessorName),
        ]
        .into_iter()
        .flatten()
        .collect();

        Ok(Self {
            name_masks,
            identifier_masks: identifier_patterns(),
        })
    }

    /// Produce the redacted copy of one source document
    ///
    /// Page-structured documents are masked page by page: label zones first
    /// (known header/value layouts per template), then patterns, preserving
    /// page count and every non-sensitive line. Free text gets whole-word
    /// name substitution plus pattern masking.
    ///
    /// The pattern set is scoped by document kind: bare digit-run patterns
    /// (phones, dates, long numeric identifiers) are not applied to the
    /// capacity test results, whose percentile rows are the extraction
    /// payload. Names, e-mails, and links still mask there.
    ///
    /// The verification re-scan runs before returning; a document that
    /// still matches a name or identifier pattern is never emitted.
    pub fn redact(&self, doc: &SourceDocument) -> Result<RedactedDocument, RedactionError> {
        let mut spans = Vec::new();
        let kind = doc.kind();

        let content = match doc.content() {
            DocumentContent::Paged(pages) => {
                let masked: Vec<String> = pages
                    .iter()
                    .enumerate()
                    .map(|(idx, page)| self.mask_page(kind, page, idx, &mut spans))
                    .collect();
                DocumentContent::Paged(masked)
            }
            DocumentContent::Text(text) => {
                DocumentContent::Text(self.mask_text(kind, text, None, &mut spans))
            }
        };

        let redacted = RedactedDocument {
            kind: doc.kind(),
            content,
            spans,
        };

        self.verify(&redacted)?;

        info!(
            "Redacted {} ({} span(s) masked)",
            redacted.kind,
            redacted.spans.len()
        );
        Ok(redacted)
    }

    /// Re-scan redacted content for surviving names and identifier patterns
    ///
    /// This is the hard gate: callers must not forward content to the AI
    /// layer when this fails. Exposed separately so audits can re-check
    /// retained artifacts. The scan uses the same kind-scoped pattern set
    /// as masking, so intentionally preserved score rows do not trip it.
    pub fn verify(&self, doc: &RedactedDocument) -> Result<(), RedactionError> {
        let text = doc.text();
        for mask in self
            .name_masks
            .iter()
            .chain(self.identifier_masks_for(doc.kind))
        {
            if let Some(found) = mask.regex.find(&text) {
                debug!(
                    "Verification hit for {:?} at byte {} in {}",
                    mask.placeholder,
                    found.start(),
                    doc.kind
                );
                return Err(RedactionError::Incomplete {
                    kind: doc.kind,
                    detail: format!("{:?} pattern survived redaction", mask.placeholder),
                });
            }
        }
        Ok(())
    }

    /// Mask one page: label zones, then name and identifier patterns
    fn mask_page(
        &self,
        kind: DocumentKind,
        page: &str,
        page_idx: usize,
        spans: &mut Vec<RedactionSpan>,
    ) -> String {
        let zoned = mask_label_zones(page, page_idx, spans);
        self.mask_text(kind, &zoned, Some(page_idx), spans)
    }

    /// Apply every pattern in order: identifiers first, then names
    ///
    /// An e-mail like `jane.doe@example.com` must be masked whole; masking
    /// the name first would split the address and leave the domain behind.
    fn mask_text(
        &self,
        kind: DocumentKind,
        text: &str,
        page: Option<usize>,
        spans: &mut Vec<RedactionSpan>,
    ) -> String {
        let mut current = text.to_string();
        for mask in self.identifier_masks_for(kind).chain(self.name_masks.iter()) {
            current = mask_all(&current, mask, page, spans);
        }
        current
    }

    /// The identifier patterns that apply to the given document kind
    ///
    /// The capacity test results are exempt from digit-run patterns: a bare
    /// percentile row reads like a phone number, and masking it would
    /// destroy the scores the extraction exists to produce.
    fn identifier_masks_for(&self, kind: DocumentKind) -> impl Iterator<Item = &MaskPattern> {
        let skip_digit_runs = kind == DocumentKind::CognitiveResult;
        self.identifier_masks
            .iter()
            .filter(move |mask| !(skip_digit_runs && mask.digit_run))
    }
}

/// Replace every match of one pattern, recording the masked spans
///
/// Span offsets are relative to the content as it stood when this pattern
/// ran; the audit trail preserves masking order.
fn mask_all(
    text: &str,
    mask: &MaskPattern,
    page: Option<usize>,
    spans: &mut Vec<RedactionSpan>,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for found in mask.regex.find_iter(text) {
        out.push_str(&text[last..found.start()]);
        out.push_str(mask.placeholder.token());
        spans.push(RedactionSpan {
            page,
            start: found.start(),
            end: found.end(),
            placeholder: mask.placeholder,
        });
        last = found.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Mask label zones on a page-structured template
///
/// Two layouts occur in the known templates: `Label: value` on one line,
/// and a label line followed by its value on the next line. Line count is
/// preserved either way.
fn mask_label_zones(page: &str, page_idx: usize, spans: &mut Vec<RedactionSpan>) -> String {
    let mut offset = 0;
    let mut pending: Option<PlaceholderKind> = None;
    let mut out_lines = Vec::new();

    for line in page.split('\n') {
        let line_start = offset;
        offset += line.len() + 1;

        // value line announced by the previous label line
        if let Some(placeholder) = pending.take() {
            if !line.trim().is_empty() {
                spans.push(RedactionSpan {
                    page: Some(page_idx),
                    start: line_start,
                    end: line_start + line.len(),
                    placeholder,
                });
                out_lines.push(placeholder.token().to_string());
                continue;
            }
        }

        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();
        let lower = trimmed.to_ascii_lowercase();

        let Some((label, placeholder)) =
            LABEL_ZONES.iter().find(|(label, _)| lower.starts_with(label))
        else {
            out_lines.push(line.to_string());
            continue;
        };

        let after = &trimmed[label.len()..];
        let rest = after.trim_start();
        if let Some(value) = rest.strip_prefix(':') {
            if value.trim().is_empty() {
                // bare `Label:` line, value expected on the next line
                pending = Some(*placeholder);
                out_lines.push(line.to_string());
            } else {
                // `Label: value` on one line; keep the label, mask the value
                let colon = indent + label.len() + (after.len() - rest.len());
                spans.push(RedactionSpan {
                    page: Some(page_idx),
                    start: line_start + colon + 1,
                    end: line_start + line.len(),
                    placeholder: *placeholder,
                });
                out_lines.push(format!("{} {}", &line[..=colon], placeholder.token()));
            }
        } else if rest.is_empty() {
            // label on its own line, value on the next line
            pending = Some(*placeholder);
            out_lines.push(line.to_string());
        } else {
            // prose that merely starts with a label word
            out_lines.push(line.to_string());
        }
    }

    out_lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use candor_domain::DocumentKind;

    fn redactor() -> Redactor {
        let profile = RedactionProfile::default()
            .with_candidate_alias("Jane Doe")
            .with_assessor_alias("Alex Mercer");
        Redactor::new(&profile).unwrap()
    }

    fn notes(text: &str) -> SourceDocument {
        SourceDocument::new(DocumentKind::AssessorNotes, DocumentContent::Text(text.into()))
    }

    fn report(pages: Vec<&str>) -> SourceDocument {
        SourceDocument::new(
            DocumentKind::PersonalityReport,
            DocumentContent::Paged(pages.into_iter().map(String::from).collect()),
        )
    }

    #[test]
    fn test_names_are_masked_whole_word_case_insensitive() {
        let doc = notes("JANE DOE spoke first. Later jane agreed with Mercer.");
        let redacted = redactor().redact(&doc).unwrap();
        let text = redacted.text();
        assert!(text.contains("[CANDIDATE] spoke first"));
        assert!(text.contains("Later [CANDIDATE] agreed"));
        assert!(text.contains("[ASSESSOR]"));
    }

    #[test]
    fn test_name_inside_longer_word_survives() {
        let profile = RedactionProfile::default()
            .with_candidate_alias("Ann Smits")
            .with_assessor_alias("Alex Mercer");
        let redactor = Redactor::new(&profile).unwrap();

        let doc = notes("The Annual budget case went well for Ann.");
        let redacted = redactor.redact(&doc).unwrap();
        let text = redacted.text();
        assert!(text.contains("Annual"));
        assert!(text.contains("[CANDIDATE]."));
    }

    #[test]
    fn test_identifiers_are_masked_in_free_text() {
        let doc = notes("Reach her at jane.doe@example.com or +32 476 12 34 56, id 12345678.");
        let redacted = redactor().redact(&doc).unwrap();
        let text = redacted.text();
        assert!(text.contains("[EMAIL]"));
        assert!(text.contains("[PHONE]"));
        assert!(text.contains("[ID]"));
        assert!(!text.contains("example.com"));
    }

    #[test]
    fn test_dates_mask_as_birth_dates() {
        let doc = notes("Candidate was born 12-03-1995 in Ghent.");
        let redacted = redactor().redact(&doc).unwrap();
        assert!(redacted.text().contains("[BIRTH-DATE]"));
    }

    #[test]
    fn test_label_zone_same_line() {
        let doc = report(vec!["Profile\nAddress: 12 Elm Street, Ghent\nStrengths: curiosity"]);
        let redacted = redactor().redact(&doc).unwrap();
        let text = redacted.text();
        assert!(text.contains("Address: [ADDRESS]"));
        assert!(text.contains("Strengths: curiosity"));
    }

    #[test]
    fn test_label_zone_next_line() {
        let doc = report(vec!["Date of birth:\n12/03/1995\nSummary follows"]);
        let redacted = redactor().redact(&doc).unwrap();
        let text = redacted.text();
        assert!(text.contains("Date of birth:\n[BIRTH-DATE]"));
        assert!(text.contains("Summary follows"));
    }

    #[test]
    fn test_page_structure_is_preserved() {
        let doc = report(vec![
            "Jane Doe\nIntro page",
            "Middle page without secrets",
            "Closing notes by Alex Mercer",
        ]);
        let redacted = redactor().redact(&doc).unwrap();

        assert_eq!(redacted.content.page_count(), Some(3));
        match &redacted.content {
            DocumentContent::Paged(pages) => {
                assert_eq!(pages[1], "Middle page without secrets");
                assert_eq!(pages[0].lines().count(), 2);
            }
            _ => panic!("expected paged content"),
        }
    }

    #[test]
    fn test_cognitive_score_rows_survive_redaction() {
        let doc = SourceDocument::new(
            DocumentKind::CognitiveResult,
            DocumentContent::Paged(vec![
                "Results for Jane Doe\nProctor: proctor@example.com\n\
                 Total score 82 (7)\n82 75 68 80 77 85"
                    .into(),
            ]),
        );
        let redacted = redactor().redact(&doc).unwrap();
        let text = redacted.text();

        // the percentile row is the extraction payload and must survive
        assert!(text.contains("82 75 68 80 77 85"));
        assert!(text.contains("Total score 82 (7)"));
        // names and e-mails still mask on a score page
        assert!(text.contains("[CANDIDATE]"));
        assert!(text.contains("[EMAIL]"));
        assert!(!text.to_lowercase().contains("jane"));
    }

    #[test]
    fn test_bare_digit_rows_still_mask_outside_score_documents() {
        let doc = notes("Scores discussed were 82 75 68 80 77 85 overall.");
        let redacted = redactor().redact(&doc).unwrap();
        let text = redacted.text();
        assert!(text.contains("[PHONE]"));
        assert!(!text.contains("82 75 68 80 77 85"));
    }

    #[test]
    fn test_redaction_is_deterministic() {
        let doc = notes("Jane Doe, jane.doe@example.com, +32 476 12 34 56, born 12-03-1995.");
        let redactor = redactor();
        let a = redactor.redact(&doc).unwrap();
        let b = redactor.redact(&doc).unwrap();
        assert_eq!(a.text(), b.text());
        assert_eq!(a.spans, b.spans);
    }

    #[test]
    fn test_spans_record_what_was_masked() {
        let doc = notes("Jane Doe wrote to jane.doe@example.com");
        let redacted = redactor().redact(&doc).unwrap();
        assert!(redacted
            .spans
            .iter()
            .any(|s| s.placeholder == PlaceholderKind::CandidateName));
        assert!(redacted
            .spans
            .iter()
            .any(|s| s.placeholder == PlaceholderKind::Email));
    }

    #[test]
    fn test_verification_catches_a_leak() {
        let redactor = redactor();
        let leaked = RedactedDocument {
            kind: DocumentKind::AssessorNotes,
            content: DocumentContent::Text("Jane Doe was never masked here".into()),
            spans: Vec::new(),
        };
        let err = redactor.verify(&leaked).unwrap_err();
        match err {
            RedactionError::Incomplete { kind, .. } => {
                assert_eq!(kind, DocumentKind::AssessorNotes);
            }
            other => panic!("expected Incomplete, got {:?}", other),
        }
    }

    #[test]
    fn test_redacted_output_passes_its_own_verification() {
        let redactor = redactor();
        let doc = notes(
            "Jane Doe (jane.doe@example.com, +32 476 12 34 56) met Alex Mercer on 12-03-2024. \
             National register 85.07.30-033.28, see https://example.org/profile.",
        );
        let redacted = redactor.redact(&doc).unwrap();
        assert!(redactor.verify(&redacted).is_ok());
    }

    #[test]
    fn test_empty_profile_is_rejected() {
        let err = Redactor::new(&RedactionProfile::default()).unwrap_err();
        assert!(matches!(err, RedactionError::EmptyProfile));
    }
}
