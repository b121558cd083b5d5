//! JSON-Schema cleanup for backends that reject extra keywords.

use serde_json::Value;

/// Keywords Gemini's function declarations do not accept.
const UNSUPPORTED_KEYWORDS: &[&str] = &[
    "$schema",
    "$id",
    "additionalProperties",
    "default",
    "examples",
    "title",
];

/// Returns `schema` with unsupported keywords removed at every level.
///
/// Keys directly under `properties` are property names, not keywords, and
/// are left alone even if they collide with one (a property called `title`).
pub fn sanitize(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let mut cleaned = serde_json::Map::with_capacity(map.len());
            for (key, value) in map {
                if UNSUPPORTED_KEYWORDS.contains(&key.as_str()) {
                    continue;
                }
                let value = match (key.as_str(), value) {
                    ("properties", Value::Object(props)) => Value::Object(
                        props
                            .iter()
                            .map(|(name, prop)| (name.clone(), sanitize(prop)))
                            .collect(),
                    ),
                    _ => sanitize(value),
                };
                cleaned.insert(key.clone(), value);
            }
            Value::Object(cleaned)
        }
        Value::Array(items) => Value::Array(items.iter().map(sanitize).collect()),
        other => other.clone(),
    }
}
