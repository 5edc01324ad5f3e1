//! The structured record: the validated aggregate of extracted fields

use crate::program::{Gender, ProgramType};
use crate::run::{Run, RunId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A validated value extracted for one named output field
///
/// The three payload types prompts may produce: free text, a list of text
/// items, or a list of enumerated labels. Labels and items both serialize
/// as JSON arrays; the distinction matters at validation time, not on disk
/// (a persisted record reads back as items).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Free text
    Text(String),
    /// List of text items
    Items(Vec<String>),
    /// List of values drawn from an enumerated label set
    Labels(Vec<String>),
}

impl FieldValue {
    /// Borrow as text, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Items(_) | FieldValue::Labels(_) => None,
        }
    }

    /// Borrow as a list, of either flavour
    pub fn as_items(&self) -> Option<&[String]> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::Items(items) | FieldValue::Labels(items) => Some(items),
        }
    }
}

/// The validated field map produced by one prompt
pub type Payload = BTreeMap<String, FieldValue>;

/// One prompt spec resolved for one run
///
/// Exactly one result exists per prompt per run. A result without a payload
/// is a terminal per-prompt failure; the raw output of the last attempt is
/// preserved for diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptResult {
    /// Identifier of the prompt spec this resolves
    pub prompt_id: String,
    /// Raw model output from the last attempt
    pub raw_output: String,
    /// Parsed and shape-validated payload, if any attempt succeeded
    pub payload: Option<Payload>,
    /// How many attempts were spent
    pub attempts: u32,
    /// Why the prompt failed, when it did
    pub failure: Option<String>,
}

impl PromptResult {
    /// Whether this prompt resolved with a validated payload
    pub fn is_resolved(&self) -> bool {
        self.payload.is_some()
    }
}

/// The aggregate of all prompt results for a run plus run metadata
///
/// Written once, then immutable. Complete when every catalog prompt has a
/// validated payload; otherwise `missing` names the fields the renderer
/// will not receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredRecord {
    /// Run identifier
    pub run_id: RunId,
    /// Candidate name (never present in prompt payloads, only here)
    pub candidate_name: String,
    /// Assessor name
    pub assessor_name: String,
    /// Candidate gender, for pronoun resolution in the renderer
    pub gender: Gender,
    /// Traineeship program
    pub program: ProgramType,
    /// Run creation timestamp (seconds since Unix epoch)
    pub created_at: u64,
    /// Flattened field map with stable keys, for the renderer
    pub fields: BTreeMap<String, FieldValue>,
    /// Manifest of prompts that failed terminally
    pub missing: Vec<String>,
    /// Full per-prompt results, keyed by prompt identifier
    pub results: BTreeMap<String, PromptResult>,
}

impl StructuredRecord {
    /// Assemble the record from a run and its resolved prompt results
    ///
    /// Field keys are stable across program types: a single-field payload
    /// flattens to the prompt id itself, a multi-field payload to
    /// `{prompt_id}.{field}`.
    pub fn assemble(run: &Run, prompt_results: Vec<PromptResult>) -> Self {
        let mut fields = BTreeMap::new();
        let mut missing = Vec::new();
        let mut results = BTreeMap::new();

        for result in prompt_results {
            match &result.payload {
                Some(payload) => {
                    for (name, value) in payload {
                        let key = if payload.len() == 1 {
                            result.prompt_id.clone()
                        } else {
                            format!("{}.{}", result.prompt_id, name)
                        };
                        fields.insert(key, value.clone());
                    }
                }
                None => missing.push(result.prompt_id.clone()),
            }
            results.insert(result.prompt_id.clone(), result);
        }

        Self {
            run_id: run.id,
            candidate_name: run.candidate_name.clone(),
            assessor_name: run.assessor_name.clone(),
            gender: run.gender,
            program: run.program,
            created_at: run.created_at,
            fields,
            missing,
            results,
        }
    }

    /// Whether every prompt resolved successfully
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Number of prompts that resolved with a validated payload
    pub fn resolved_count(&self) -> usize {
        self.results.values().filter(|r| r.is_resolved()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(id: &str, text: &str) -> PromptResult {
        let mut payload = Payload::new();
        payload.insert("text".into(), FieldValue::Text(text.into()));
        PromptResult {
            prompt_id: id.into(),
            raw_output: text.into(),
            payload: Some(payload),
            attempts: 1,
            failure: None,
        }
    }

    fn failed(id: &str) -> PromptResult {
        PromptResult {
            prompt_id: id.into(),
            raw_output: "garbage".into(),
            payload: None,
            attempts: 3,
            failure: Some("missing field 'text'".into()),
        }
    }

    fn test_run() -> Run {
        Run::new("Jane Doe", "Alex Mercer", Gender::F, ProgramType::Mcp)
    }

    #[test]
    fn test_assemble_flattens_single_field_to_prompt_id() {
        let record = StructuredRecord::assemble(&test_run(), vec![resolved("first_impression", "calm")]);
        assert_eq!(
            record.fields.get("first_impression"),
            Some(&FieldValue::Text("calm".into()))
        );
        assert!(record.is_complete());
    }

    #[test]
    fn test_assemble_collects_missing_manifest() {
        let record = StructuredRecord::assemble(
            &test_run(),
            vec![resolved("personality", "steady"), failed("interests")],
        );
        assert_eq!(record.missing, vec!["interests".to_string()]);
        assert_eq!(record.resolved_count(), 1);
        assert!(!record.is_complete());
        // The failed result keeps its last raw output for diagnosis
        assert_eq!(record.results["interests"].raw_output, "garbage");
    }

    #[test]
    fn test_multi_field_payload_gets_dotted_keys() {
        let mut payload = Payload::new();
        payload.insert("summary".into(), FieldValue::Text("ok".into()));
        payload.insert("themes".into(), FieldValue::Items(vec!["focus".into()]));
        let result = PromptResult {
            prompt_id: "personality".into(),
            raw_output: String::new(),
            payload: Some(payload),
            attempts: 1,
            failure: None,
        };

        let record = StructuredRecord::assemble(&test_run(), vec![result]);
        assert!(record.fields.contains_key("personality.summary"));
        assert!(record.fields.contains_key("personality.themes"));
    }

    #[test]
    fn test_record_serializes_to_stable_json() {
        let record = StructuredRecord::assemble(&test_run(), vec![resolved("interests", "data")]);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["program"], "MCP");
        assert_eq!(json["fields"]["interests"], "data");
    }
}
