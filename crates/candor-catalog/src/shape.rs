//! Expected output shapes and their validation

use candor_domain::{FieldValue, Payload};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Why a model output failed shape validation
#[derive(Error, Debug, Clone, PartialEq)]
#[error("field '{field}': {reason}")]
pub struct ShapeViolation {
    /// The named field that failed
    pub field: String,
    /// What was wrong with it
    pub reason: String,
}

/// Type of one named output field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// Free text, non-empty
    Text,
    /// List of text items with an allowed size range
    TextList {
        /// Minimum number of items
        min_items: usize,
        /// Maximum number of items
        max_items: usize,
    },
    /// List of enumerated labels, optionally of a fixed length
    ///
    /// Numeric labels ("-1", "0", "1") also accept bare JSON numbers,
    /// since models routinely return them unquoted.
    LabelList {
        /// The allowed label values
        allowed: Vec<String>,
        /// Exact expected length, if fixed
        expected_len: Option<usize>,
    },
}

/// One named field in an output shape
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Field name as it must appear in the model's JSON object
    pub name: String,
    /// Expected type
    pub ty: FieldType,
}

/// The expected output shape of one prompt: a set of named, typed fields
#[derive(Debug, Clone, PartialEq)]
pub struct OutputShape {
    /// The named fields, all required
    pub fields: Vec<FieldSpec>,
}

impl OutputShape {
    /// Single free-text field named `text`
    pub fn text() -> Self {
        Self {
            fields: vec![FieldSpec {
                name: "text".into(),
                ty: FieldType::Text,
            }],
        }
    }

    /// Single text-list field with the given size range
    pub fn text_list(name: &str, min_items: usize, max_items: usize) -> Self {
        Self {
            fields: vec![FieldSpec {
                name: name.into(),
                ty: FieldType::TextList {
                    min_items,
                    max_items,
                },
            }],
        }
    }

    /// Single label-list field over the given alphabet
    pub fn label_list(name: &str, allowed: &[&str], expected_len: Option<usize>) -> Self {
        Self {
            fields: vec![FieldSpec {
                name: name.into(),
                ty: FieldType::LabelList {
                    allowed: allowed.iter().map(|s| s.to_string()).collect(),
                    expected_len,
                },
            }],
        }
    }

    /// Validate a parsed model output against this shape
    ///
    /// The output must be a JSON object carrying every named field with the
    /// declared type. Returns the validated payload, or the first violation.
    pub fn validate(&self, value: &Value) -> Result<Payload, ShapeViolation> {
        let object = value.as_object().ok_or_else(|| ShapeViolation {
            field: "<root>".into(),
            reason: "expected a JSON object".into(),
        })?;

        let mut payload = Payload::new();
        for field in &self.fields {
            let raw = object.get(&field.name).ok_or_else(|| ShapeViolation {
                field: field.name.clone(),
                reason: "missing".into(),
            })?;
            payload.insert(field.name.clone(), validate_field(field, raw)?);
        }
        Ok(payload)
    }

    /// Human-readable shape description appended to every prompt
    pub fn hint(&self) -> String {
        let mut hint = String::from("Return ONLY a JSON object with ");
        let described: Vec<String> = self
            .fields
            .iter()
            .map(|f| format!("\"{}\" ({})", f.name, f.ty))
            .collect();
        hint.push_str(&described.join(", "));
        hint.push('.');
        hint
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Text => write!(f, "a non-empty string"),
            FieldType::TextList {
                min_items,
                max_items,
            } => write!(f, "an array of {}-{} strings", min_items, max_items),
            FieldType::LabelList {
                allowed,
                expected_len,
            } => {
                match expected_len {
                    Some(len) => write!(f, "an array of exactly {} values, ", len)?,
                    None => write!(f, "an array of values, ")?,
                }
                write!(f, "each one of: {}", allowed.join(", "))
            }
        }
    }
}

fn validate_field(field: &FieldSpec, raw: &Value) -> Result<FieldValue, ShapeViolation> {
    let violation = |reason: String| ShapeViolation {
        field: field.name.clone(),
        reason,
    };

    match &field.ty {
        FieldType::Text => {
            let text = raw
                .as_str()
                .ok_or_else(|| violation("expected a string".into()))?;
            if text.trim().is_empty() {
                return Err(violation("empty text".into()));
            }
            Ok(FieldValue::Text(text.trim().to_string()))
        }
        FieldType::TextList {
            min_items,
            max_items,
        } => {
            let items = coerce_string_array(raw).map_err(&violation)?;
            if items.len() < *min_items || items.len() > *max_items {
                return Err(violation(format!(
                    "expected {}-{} items, got {}",
                    min_items,
                    max_items,
                    items.len()
                )));
            }
            if items.iter().any(|i| i.trim().is_empty()) {
                return Err(violation("contains an empty item".into()));
            }
            Ok(FieldValue::Items(items))
        }
        FieldType::LabelList {
            allowed,
            expected_len,
        } => {
            let items = coerce_string_array(raw).map_err(&violation)?;
            if let Some(len) = expected_len {
                if items.len() != *len {
                    return Err(violation(format!(
                        "expected exactly {} values, got {}",
                        len,
                        items.len()
                    )));
                }
            }
            for item in &items {
                if !allowed.iter().any(|a| a.eq_ignore_ascii_case(item)) {
                    return Err(violation(format!("'{}' is not an allowed label", item)));
                }
            }
            Ok(FieldValue::Labels(items))
        }
    }
}

/// Coerce a JSON array of strings or numbers into strings
fn coerce_string_array(raw: &Value) -> Result<Vec<String>, String> {
    let array = raw.as_array().ok_or("expected an array")?;
    array
        .iter()
        .map(|v| match v {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(format!("unexpected array element: {}", other)),
        })
        .collect()
}
