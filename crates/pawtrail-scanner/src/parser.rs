//! Parse LLM output into an [`Analysis`]
//!
//! Decoding fails closed: any shape other than the one the prompt asks for is
//! reported as an error so the caller can log and skip the line.

use crate::error::ScannerError;
use pawtrail_domain::{AnimalRecord, Analysis, NgoRecord};
use serde_json::{Map, Value};

/// Parse an LLM response into an analysis
pub fn parse_analysis(response: &str) -> Result<Analysis, ScannerError> {
    let json_str = extract_json(response)?;
    if json_str.trim().is_empty() {
        return Err(ScannerError::EmptyResponse);
    }

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| ScannerError::InvalidFormat(format!("JSON parse error: {}", e)))?;

    let obj = json
        .as_object()
        .ok_or_else(|| ScannerError::InvalidFormat("Expected JSON object".to_string()))?;

    let animal = match sub_record(obj, "animal")? {
        Some(map) => Some(AnimalRecord {
            kind: text_field(map, "animal", "type")?,
            age: text_field(map, "animal", "age")?,
            location: text_field(map, "animal", "location")?,
            contact: text_field(map, "animal", "contact")?,
            drive_link: text_field(map, "animal", "drive_link")?,
        }),
        None => None,
    };

    let ngo = match sub_record(obj, "ngo")? {
        Some(map) => Some(NgoRecord {
            name: text_field(map, "ngo", "name")?,
            location: text_field(map, "ngo", "location")?,
            kind: text_field(map, "ngo", "type")?,
            contact: text_field(map, "ngo", "contact")?,
        }),
        None => None,
    };

    Ok(Analysis { animal, ngo })
}

/// Extract JSON from response, handling reasoning blocks and markdown code fences
fn extract_json(response: &str) -> Result<String, ScannerError> {
    let mut trimmed = response.trim();

    // Reasoning models may prefix the answer with a <think> block
    if trimmed.starts_with("<think>") {
        trimmed = match trimmed.find("</think>") {
            Some(end) => trimmed[end + "</think>".len()..].trim(),
            None => return Err(ScannerError::InvalidFormat("Unterminated <think> block".to_string())),
        };
    }

    if trimmed.is_empty() {
        return Err(ScannerError::EmptyResponse);
    }

    // Check if wrapped in markdown code block
    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(ScannerError::InvalidFormat("Empty code block".to_string()));
        }

        // Skip first line (```json or ```) and the closing fence if present
        let end = if lines[lines.len() - 1].trim_start().starts_with("```") {
            lines.len() - 1
        } else {
            lines.len()
        };
        Ok(lines[1..end].join("\n"))
    } else {
        // Already raw JSON
        Ok(trimmed.to_string())
    }
}

/// Look up an optional sub-record; `null` and `{}` count as absent
fn sub_record<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>, ScannerError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) if map.is_empty() => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(ScannerError::InvalidFormat(format!(
            "'{}' must be an object, got {}",
            key,
            type_name(other)
        ))),
    }
}

/// Read a text field; numbers are accepted and rendered as text
fn text_field(
    map: &Map<String, Value>,
    record: &str,
    field: &str,
) -> Result<Option<String>, ScannerError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(ScannerError::InvalidFormat(format!(
            "'{}.{}' must be a string, got {}",
            record,
            field,
            type_name(other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
