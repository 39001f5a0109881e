use super::{Normalizer, UNAVAILABLE, Walk};
use crate::domain::{ErrorValue, Value};
use serde_json::{Map as JsonMap, Value as JsonValue};

// Standard fields; properties with these names cannot shadow them.
const RESERVED: [&str; 3] = ["name", "message", "stack"];

/// Normalizes a single error with a fresh traversal.
pub fn normalize_error(err: &ErrorValue) -> JsonValue {
    Normalizer::new()
        .normalize(&Value::Error(err.clone()))
        .unwrap_or(JsonValue::Null)
}

/// Splits raw stack text into frames: drops the header line, trims each line, skips blanks.
pub fn stack_lines(stack: Option<&str>) -> Vec<String> {
    stack
        .map(|raw| {
            raw.lines()
                .skip(1)
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub(super) fn error_record(walk: &mut Walk, err: &ErrorValue) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("name".to_string(), JsonValue::from(err.name()));
    out.insert("message".to_string(), JsonValue::from(err.message()));

    match err.properties().try_borrow() {
        Ok(properties) => {
            let extra: Vec<(String, Value)> = properties
                .iter()
                .filter(|(key, _)| !RESERVED.contains(&key.as_str()))
                .cloned()
                .collect();
            drop(properties);
            out.extend(walk.members(&extra));
        }
        // Mutably borrowed while rendering: mark the properties, keep the rest.
        Err(_) => {
            out.insert(
                "properties".to_string(),
                JsonValue::String(UNAVAILABLE.to_string()),
            );
        }
    }

    let frames = stack_lines(err.stack().as_deref());
    out.insert(
        "stack".to_string(),
        JsonValue::Array(frames.into_iter().map(JsonValue::String).collect()),
    );
    JsonValue::Object(out)
}
