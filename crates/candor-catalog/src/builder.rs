//! Prompt assembly: template + redacted documents + dependency context

use crate::spec::{PromptId, PromptSpec, RepairStrategy};
use candor_domain::{DocumentKind, FieldValue, Payload};

/// Fixed formatting-correction paragraph appended by the repair strategies
pub const FORMAT_CORRECTION: &str = "\
IMPORTANT CORRECTION: your previous answer did not match the required \
format. Return ONLY the JSON object described above, with every named \
field present, no markdown fences, no backslashes, and no text before or \
after the object.";

/// Document context is cut to this size when a truncate repair kicks in
const TRUNCATED_DOC_CHARS: usize = 4_000;

/// Builds the outbound prompt payload for one spec
///
/// Only redacted document text ever enters a builder; the orchestrator
/// enforces that raw source documents never reach this point.
pub struct PromptBuilder<'a> {
    spec: &'a PromptSpec,
    documents: Vec<(DocumentKind, String)>,
    dependencies: Vec<(PromptId, Option<String>)>,
}

impl<'a> PromptBuilder<'a> {
    /// Start building for one spec
    pub fn new(spec: &'a PromptSpec) -> Self {
        Self {
            spec,
            documents: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Attach one redacted document's text
    pub fn with_document(mut self, kind: DocumentKind, text: String) -> Self {
        self.documents.push((kind, text));
        self
    }

    /// Attach one resolved dependency
    ///
    /// `None` marks a dependency that failed; it is rendered as an explicit
    /// placeholder so downstream prompts are never blocked.
    pub fn with_dependency(mut self, id: PromptId, payload: Option<&Payload>) -> Self {
        self.dependencies.push((id, payload.map(render_payload)));
        self
    }

    /// Assemble the prompt for the given attempt (1-based)
    ///
    /// Attempts after the first apply the spec's repair strategy.
    pub fn build_for_attempt(&self, attempt: u32) -> String {
        let repairing = attempt > 1;
        let mut prompt = String::new();

        prompt.push_str(&format!("Section: {}\n\n", self.spec.id));
        prompt.push_str(self.spec.template);
        prompt.push_str("\n\n");

        if !self.dependencies.is_empty() {
            prompt.push_str("Previously extracted sections, for consistency:\n");
            for (id, rendered) in &self.dependencies {
                prompt.push_str(&format!("## {}\n", id));
                match rendered {
                    Some(text) => prompt.push_str(text),
                    None => prompt.push_str("[not available]"),
                }
                prompt.push('\n');
            }
            prompt.push('\n');
        }

        prompt.push_str(
            "Use only the following anonymized documents to complete the task:\n\n",
        );
        for (kind, text) in &self.documents {
            let body = if repairing && self.spec.repair == RepairStrategy::TruncateAndRetry {
                truncate_chars(text, TRUNCATED_DOC_CHARS)
            } else {
                text.as_str()
            };
            prompt.push_str(&format!("File: {}\n---\n{}\n---\n\n", kind.label(), body));
        }

        prompt.push_str(&self.spec.shape.hint());

        if repairing && self.spec.repair != RepairStrategy::None {
            prompt.push_str("\n\n");
            prompt.push_str(FORMAT_CORRECTION);
        }

        prompt
    }
}

/// Render a validated payload for use as dependency context
fn render_payload(payload: &Payload) -> String {
    let mut out = String::new();
    for value in payload.values() {
        match value {
            FieldValue::Text(text) => {
                out.push_str(text);
                out.push('\n');
            }
            FieldValue::Items(items) | FieldValue::Labels(items) => {
                for item in items {
                    out.push_str("- ");
                    out.push_str(item);
                    out.push('\n');
                }
            }
        }
    }
    out
}

/// Cut at a char boundary so truncation never splits a code point
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
