//! Turn raw backend output into a payload: parse, merge the seed on top,
//! and map "no value" placeholders to `null`.

use serde_json::Value;

use crate::{
    error::{GenerationError, Result},
    seed::{Payload, Seed},
};

/// Strings the backend emits instead of omitting a required key.
pub const EMPTY_SENTINELS: [&str; 2] = ["", "-"];

/// Parse, merge and clean a raw backend response.
///
/// Seed values replace generated values for the same key; keys only present
/// in the seed are appended.
pub fn normalize(raw: &str, seed: &Seed) -> Result<Payload> {
    let mut payload = parse_response(raw)?;
    merge_seed(&mut payload, seed);
    map_sentinels(&mut payload);
    Ok(payload)
}

/// Parse `raw` as a JSON object.
pub fn parse_response(raw: &str) -> Result<Payload> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|err| GenerationError::MalformedResponse(format!("invalid JSON: {err}")))?;

    match value {
        Value::Object(payload) => Ok(payload),
        other => Err(GenerationError::MalformedResponse(format!(
            "expected a JSON object, got {}",
            kind(&other)
        ))),
    }
}

pub fn merge_seed(payload: &mut Payload, seed: &Seed) {
    for (key, value) in seed {
        payload.insert(key.clone(), value.clone());
    }
}

/// Replace sentinel strings with `null` on the payload's own fields. Nested
/// relation payloads are left untouched.
pub fn map_sentinels(payload: &mut Payload) {
    for value in payload.values_mut() {
        if is_sentinel(value) {
            *value = Value::Null;
        }
    }
}

pub fn is_sentinel(value: &Value) -> bool {
    matches!(value, Value::String(s) if EMPTY_SENTINELS.contains(&s.as_str()))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
