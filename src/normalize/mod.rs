//! Reduces an arbitrary [`Value`] graph to a JSON-safe tree.
//!
//! The walk is depth-first and pre-order. Composites currently on the path from the root are
//! kept in an ancestry set; meeting one of them again means the graph loops back on itself and
//! the edge is replaced by [`CIRCULAR`]. A composite reached again through a sibling branch is
//! not an ancestor and is walked again.

mod error;

pub use error::{normalize_error, stack_lines};

use crate::domain::{Handle, Value};
use bytes::Bytes;
use chrono::SecondsFormat;
use serde_json::{Map as JsonMap, Value as JsonValue, json};
use std::collections::HashSet;

/// Replaces a reference back to an ancestor.
pub const CIRCULAR: &str = "[Circular]";
/// Replaces a composite nested deeper than the depth limit.
pub const DEPTH_EXCEEDED: &str = "[...]";
/// Replaces a composite that is mutably borrowed while the record is rendered.
pub const UNAVAILABLE: &str = "[Unavailable]";

pub const DEFAULT_DEPTH_LIMIT: usize = 256;

// Largest integer a JSON consumer using doubles reads back exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Normalizes with the default settings. `None` means the value has no JSON form and is left out.
pub fn normalize(value: &Value) -> Option<JsonValue> {
    Normalizer::new().normalize(value)
}

#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    depth_limit: usize,
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            depth_limit: DEFAULT_DEPTH_LIMIT,
        }
    }

    pub fn with_depth_limit(mut self, depth_limit: usize) -> Self {
        self.depth_limit = depth_limit;
        self
    }

    pub fn depth_limit(&self) -> usize {
        self.depth_limit
    }

    pub fn normalize(&self, value: &Value) -> Option<JsonValue> {
        Walk::new(self.depth_limit).value(value)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// State of one normalization call. Never shared between calls.
pub(crate) struct Walk {
    ancestry: HashSet<usize>,
    depth_limit: usize,
}

impl Walk {
    fn new(depth_limit: usize) -> Self {
        Self {
            ancestry: HashSet::new(),
            depth_limit,
        }
    }

    pub(crate) fn value(&mut self, value: &Value) -> Option<JsonValue> {
        match value {
            Value::Undefined => None,
            Value::Null => Some(JsonValue::Null),
            Value::Bool(b) => Some(JsonValue::Bool(*b)),
            Value::Int(n) => Some(JsonValue::from(*n)),
            Value::UInt(n) => Some(JsonValue::from(*n)),
            Value::Float(n) => Some(float(*n)),
            Value::String(s) => Some(JsonValue::String(s.clone())),
            Value::BigInt(n) => Some(JsonValue::String(n.to_string())),
            Value::Buffer(bytes) => Some(buffer(bytes)),
            Value::Date(time) => Some(JsonValue::String(
                time.to_rfc3339_opts(SecondsFormat::Millis, true),
            )),
            Value::Opaque(opaque) => opaque.repr.clone().map(JsonValue::String),
            Value::Error(err) => Some(self.enter(err.id(), |walk| error::error_record(walk, err))),
            Value::Array(items) | Value::Set(items) => {
                Some(self.composite(items, |walk, items| walk.sequence(items)))
            }
            Value::Object(object) => Some(self.composite(object, |walk, entries| {
                JsonValue::Object(walk.members(entries))
            })),
            Value::Map(map) => Some(self.composite(map, |walk, entries| walk.pairs(entries))),
        }
    }

    fn enter(&mut self, id: usize, f: impl FnOnce(&mut Self) -> JsonValue) -> JsonValue {
        if self.ancestry.contains(&id) {
            return JsonValue::String(CIRCULAR.to_string());
        }
        if self.ancestry.len() >= self.depth_limit {
            return JsonValue::String(DEPTH_EXCEEDED.to_string());
        }

        self.ancestry.insert(id);
        let out = f(self);
        self.ancestry.remove(&id);
        out
    }

    fn composite<T>(
        &mut self,
        handle: &Handle<T>,
        f: impl FnOnce(&mut Self, &T) -> JsonValue,
    ) -> JsonValue {
        self.enter(handle.id(), |walk| match handle.try_borrow() {
            Ok(inner) => f(walk, &inner),
            Err(_) => JsonValue::String(UNAVAILABLE.to_string()),
        })
    }

    fn sequence(&mut self, items: &[Value]) -> JsonValue {
        JsonValue::Array(
            items
                .iter()
                .map(|item| self.value(item).unwrap_or(JsonValue::Null))
                .collect(),
        )
    }

    pub(crate) fn members(&mut self, entries: &[(String, Value)]) -> JsonMap<String, JsonValue> {
        let mut out = JsonMap::with_capacity(entries.len());
        for (key, value) in entries {
            if let Some(json) = self.value(value) {
                out.insert(key.clone(), json);
            }
        }
        out
    }

    fn pairs(&mut self, entries: &[(Value, Value)]) -> JsonValue {
        JsonValue::Array(
            entries
                .iter()
                .map(|(key, value)| {
                    JsonValue::Array(vec![
                        self.value(key).unwrap_or(JsonValue::Null),
                        self.value(value).unwrap_or(JsonValue::Null),
                    ])
                })
                .collect(),
        )
    }
}

fn float(n: f64) -> JsonValue {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return JsonValue::from(n as i64);
    }
    serde_json::Number::from_f64(n).map_or(JsonValue::Null, JsonValue::Number)
}

fn buffer(bytes: &Bytes) -> JsonValue {
    json!({
        "type": "Buffer",
        "data": bytes.iter().copied().collect::<Vec<u8>>(),
    })
}
