mod json;

pub use json::{extract_json, parse_cli_envelope, CliEnvelope};

use crate::error::GenerationError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode a generator's payload into the stage's output type.
///
/// `null`, an empty string and an empty object count as no answer at all;
/// anything else that fails to decode is a parse failure. Nothing is
/// defaulted or partially accepted.
pub fn decode_structured<T: DeserializeOwned>(
    value: Value,
    stage: &'static str,
) -> Result<T, GenerationError> {
    let is_empty = match &value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if is_empty {
        return Err(GenerationError::EmptyResponse { stage });
    }

    // Some backends hand back the JSON document as a string
    let value = match value {
        Value::String(s) => extract_json(&s).ok_or_else(|| GenerationError::ParseFailure {
            stage,
            reason: "response text contained no JSON object".to_string(),
        })?,
        other => other,
    };

    serde_json::from_value(value).map_err(|e| {
        tracing::debug!("Failed to decode {} payload: {}", stage, e);
        GenerationError::ParseFailure {
            stage,
            reason: e.to_string(),
        }
    })
}
