//! Decoding of model replies into [`StepResult`] records
//!
//! This is the single normalization path for model output: absent fields get
//! their documented defaults, malformed output becomes a [`ParseError`].

use super::types::{Feasibility, StepResult, UNKNOWN_TOOL};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_RATIONALE: &str = "No rationale provided.";

const FIELD_FEASIBILITY: &str = "Feasibility";
const FIELD_TOOLS: &str = "Recommended Tools";
const FIELD_PRIMARY_TOOL: &str = "Recommended Primary Tool";
const FIELD_CONFIDENCE: &str = "Confidence Score";
const FIELD_RATIONALE: &str = "Rationale";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    #[error("Expected a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("Invalid value for \"{field}\": {value}")]
    InvalidField { field: &'static str, value: String },
}

/// Decodes the raw reply for `step` into a step result.
pub fn decode_step_response(step: &str, raw: &str) -> Result<StepResult, ParseError> {
    let trimmed = raw.trim();
    debug!("Decoding response ({} chars)", trimmed.len());

    let value: Value = serde_json::from_str(trimmed).map_err(|e| {
        ParseError::InvalidJson(format!(
            "{}: {}",
            e,
            trimmed.chars().take(100).collect::<String>()
        ))
    })?;

    let object = match value {
        Value::Object(object) => object,
        other => return Err(ParseError::NotAnObject(json_kind(&other))),
    };

    Ok(StepResult {
        step: step.to_string(),
        feasibility: string_field(&object, FIELD_FEASIBILITY)?
            .map(|label| Feasibility::from_label(&label))
            .unwrap_or(Feasibility::Unknown),
        recommended_tools: tools_field(&object)?,
        primary_tool: string_field(&object, FIELD_PRIMARY_TOOL)?
            .unwrap_or_else(|| UNKNOWN_TOOL.to_string()),
        confidence: confidence_field(&object)?,
        rationale: string_field(&object, FIELD_RATIONALE)?
            .unwrap_or_else(|| DEFAULT_RATIONALE.to_string()),
    })
}

fn string_field(
    object: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ParseError> {
    match object.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(ParseError::InvalidField {
            field,
            value: other.to_string(),
        }),
    }
}

fn tools_field(object: &Map<String, Value>) -> Result<Vec<String>, ParseError> {
    match object.get(FIELD_TOOLS) {
        None => Ok(Vec::new()),
        Some(Value::String(single)) => Ok(vec![single.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                Value::Number(_) | Value::Bool(_) => Ok(item.to_string()),
                other => Err(ParseError::InvalidField {
                    field: FIELD_TOOLS,
                    value: other.to_string(),
                }),
            })
            .collect(),
        Some(other) => Err(ParseError::InvalidField {
            field: FIELD_TOOLS,
            value: other.to_string(),
        }),
    }
}

/// Integers pass through, floats truncate toward zero, numeric strings parse.
/// Out-of-range values are kept as-is.
fn confidence_field(object: &Map<String, Value>) -> Result<i64, ParseError> {
    let invalid = |value: &Value| ParseError::InvalidField {
        field: FIELD_CONFIDENCE,
        value: value.to_string(),
    };

    match object.get(FIELD_CONFIDENCE) {
        None => Ok(0),
        Some(value @ Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .ok_or_else(|| invalid(value)),
        Some(value @ Value::String(s)) => s.trim().parse::<i64>().map_err(|_| invalid(value)),
        Some(value) => Err(invalid(value)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
