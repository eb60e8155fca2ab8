//! Per-format parse functions.
//!
//! Every parser has the same shape, [`ParseFn`]: raw text in, a
//! [`serde_json::Value`] out, and a plain message on failure. Formats whose
//! native value type is richer than JSON (YAML keys, TOML datetimes) are
//! converted here so templates only ever see JSON-shaped data.

use serde_json::{Map, Number, Value};

/// Signature shared by all config parsers.
pub type ParseFn = fn(&str) -> Result<Value, String>;

/// Strict JSON.
pub fn parse_json(content: &str) -> Result<Value, String> {
    serde_json::from_str(content).map_err(|e| e.to_string())
}

/// JSON5: comments, trailing commas, unquoted keys, single quotes.
pub fn parse_json5(content: &str) -> Result<Value, String> {
    json5::from_str(content).map_err(|e| e.to_string())
}

/// YAML, single document. An empty document yields `null`.
pub fn parse_yaml(content: &str) -> Result<Value, String> {
    let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
    Ok(yaml_to_json(value))
}

/// TOML document.
pub fn parse_toml(content: &str) -> Result<Value, String> {
    let table: toml::Table = toml::from_str(content).map_err(|e| e.to_string())?;
    Ok(toml_to_json(toml::Value::Table(table)))
}

/// Unknown extension: JSON first, then YAML. The YAML error wins when both fail.
pub fn parse_json_then_yaml(content: &str) -> Result<Value, String> {
    match parse_json(content) {
        Ok(value) => Ok(value),
        Err(json_err) => {
            tracing::debug!(error = %json_err, "content is not JSON, trying YAML");
            parse_yaml(content)
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

fn float_value(f: f64) -> Value {
    Number::from_f64(f).map_or(Value::Null, Value::Number)
}

fn yaml_to_json(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Y;

    match value {
        Y::Null => Value::Null,
        Y::Bool(b) => Value::Bool(b),
        Y::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64().map_or(Value::Null, float_value)
            }
        }
        Y::String(s) => Value::String(s),
        Y::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        Y::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(yaml_key(key), yaml_to_json(value));
            }
            Value::Object(map)
        }
        Y::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

/// Mapping keys become strings the way a JSON consumer would print them.
fn yaml_key(key: serde_yaml::Value) -> String {
    use serde_yaml::Value as Y;

    match key {
        Y::String(s) => s,
        Y::Null => "null".to_string(),
        Y::Bool(b) => b.to_string(),
        Y::Number(n) => n.to_string(),
        other => match yaml_to_json(other) {
            Value::String(s) => s,
            json => json.to_string(),
        },
    }
}

fn toml_to_json(value: toml::Value) -> Value {
    use toml::Value as T;

    match value {
        T::String(s) => Value::String(s),
        T::Integer(i) => Value::from(i),
        T::Float(f) => float_value(f),
        T::Boolean(b) => Value::Bool(b),
        T::Datetime(dt) => Value::String(dt.to_string()),
        T::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        T::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}
