//! Parse raw model output into a shape-validated payload

use candor_catalog::OutputShape;
use candor_domain::Payload;
use serde_json::Value;

/// Parse and validate one raw model output against the expected shape
///
/// Returns the validated payload, or a reason string that feeds the retry
/// loop and, on budget exhaustion, the prompt result's failure field.
pub(crate) fn parse_payload(raw: &str, shape: &OutputShape) -> Result<Payload, String> {
    let value = extract_json(raw)?;
    shape.validate(&value).map_err(|v| v.to_string())
}

/// Extract JSON from a response, handling markdown code fences
///
/// Models sometimes wrap JSON in ```json fences or pad it with prose; the
/// fallback takes the outermost brace-delimited window.
fn extract_json(response: &str) -> Result<Value, String> {
    let trimmed = response.trim();

    let candidate = if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err("empty code block".to_string());
        }
        // Skip the opening ```json line and the closing ``` line
        lines[1..lines.len().saturating_sub(1)].join("\n")
    } else {
        trimmed.to_string()
    };

    if let Ok(value) = serde_json::from_str(&candidate) {
        return Ok(value);
    }

    match (candidate.find('{'), candidate.rfind('}')) {
        (Some(open), Some(close)) if open < close => {
            serde_json::from_str(&candidate[open..=close])
                .map_err(|e| format!("invalid JSON: {}", e))
        }
        _ => Err("no JSON object in response".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candor_catalog::OutputShape;

    #[test]
    fn test_parse_plain_json() {
        let payload = parse_payload(r#"{"text": "steady"}"#, &OutputShape::text()).unwrap();
        assert!(payload.contains_key("text"));
    }

    #[test]
    fn test_parse_json_in_markdown_fence() {
        let raw = "```json\n{\"text\": \"steady\"}\n```";
        assert!(parse_payload(raw, &OutputShape::text()).is_ok());
    }

    #[test]
    fn test_parse_json_with_surrounding_prose() {
        let raw = "Here is the answer:\n{\"text\": \"steady\"}\nHope that helps!";
        assert!(parse_payload(raw, &OutputShape::text()).is_ok());
    }

    #[test]
    fn test_parse_rejects_prose_only() {
        let err = parse_payload("no JSON here at all", &OutputShape::text()).unwrap_err();
        assert!(err.contains("no JSON object"));
    }

    #[test]
    fn test_shape_violation_reports_the_field() {
        let err = parse_payload(r#"{"wrong": "x"}"#, &OutputShape::text()).unwrap_err();
        assert!(err.contains("text"));
    }
}
