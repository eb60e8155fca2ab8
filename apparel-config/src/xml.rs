//! XML → JSON-shaped config.
//!
//! # Mapping
//!
//! | XML                                   | Value                                   |
//! |---------------------------------------|-----------------------------------------|
//! | root element `<cfg>`                  | `{"cfg": …}`                            |
//! | attribute `port="80"`                 | `"@_port": 80` on the element's object  |
//! | `<name>Alice</name>`                  | `"name": "Alice"`                       |
//! | `<empty/>`                            | `"empty": ""`                           |
//! | `<a x="1">text</a>`                   | `"a": {"@_x": 1, "#text": "text"}`      |
//! | repeated `<item>` siblings            | `"item": [ …, … ]`                      |
//!
//! Attribute and text values are typed opportunistically (see [`typed_value`]).
//! Text is trimmed and whitespace-only text is dropped. Comments and
//! processing instructions are skipped.

use roxmltree::{Document, Node, ParsingOptions};
use serde_json::{Map, Number, Value};

/// Key prefix marking an attribute on its element's object.
pub const ATTR_PREFIX: &str = "@_";

/// Key holding an element's own text when it also has attributes or children.
pub const TEXT_KEY: &str = "#text";

/// Parse an XML document.
pub fn parse_xml(content: &str) -> Result<Value, String> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(content, options).map_err(|e| e.to_string())?;
    let root = doc.root_element();

    let mut out = Map::new();
    out.insert(qualified_name(root), element_value(root));
    Ok(Value::Object(out))
}

fn element_value(node: Node<'_, '_>) -> Value {
    let mut map = Map::new();

    for (key, uri) in declared_namespaces(node) {
        map.insert(key, typed_value(&uri));
    }

    for attr in node.attributes() {
        let name = match attr.namespace().and_then(|uri| node.lookup_prefix(uri)) {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}:{}", attr.name()),
            _ => attr.name().to_string(),
        };
        map.insert(format!("{ATTR_PREFIX}{name}"), typed_value(attr.value()));
    }

    let mut text = String::new();
    for child in node.children() {
        if child.is_element() {
            insert_child(&mut map, qualified_name(child), element_value(child));
        } else if child.is_text() {
            if let Some(chunk) = child.text() {
                text.push_str(chunk.trim());
            }
        }
    }

    if map.is_empty() {
        return if text.is_empty() {
            Value::String(String::new())
        } else {
            typed_value(&text)
        };
    }

    if !text.is_empty() {
        map.insert(TEXT_KEY.to_string(), typed_value(&text));
    }
    Value::Object(map)
}

/// Repeated siblings collapse into an array in document order.
fn insert_child(map: &mut Map<String, Value>, key: String, value: Value) {
    match map.get_mut(&key) {
        None => {
            map.insert(key, value);
        }
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
    }
}

/// `xmlns` / `xmlns:prefix` declarations made on `node` itself, as
/// `@_`-prefixed keys. roxmltree reports namespaces in scope rather than
/// declarations, so anything already in scope on the parent is skipped.
fn declared_namespaces(node: Node<'_, '_>) -> Vec<(String, String)> {
    let inherited: Vec<(Option<&str>, &str)> = node
        .parent_element()
        .map(|parent| parent.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();

    node.namespaces()
        .filter(|ns| ns.name() != Some("xml"))
        .filter(|ns| !inherited.contains(&(ns.name(), ns.uri())))
        .map(|ns| {
            let key = match ns.name() {
                Some(prefix) => format!("{ATTR_PREFIX}xmlns:{prefix}"),
                None => format!("{ATTR_PREFIX}xmlns"),
            };
            (key, ns.uri().to_string())
        })
        .collect()
}

fn qualified_name(node: Node<'_, '_>) -> String {
    let tag = node.tag_name();
    match tag.namespace().and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{}", tag.name()),
        _ => tag.name().to_string(),
    }
}

/// Type a raw attribute or text value.
///
/// `true`/`false` become booleans; plain decimal numbers become numbers
/// (integers when they fit in `i64`). Anything else, including numbers
/// with leading zeros, stays a string.
pub fn typed_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    match trimmed {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    match classify_number(trimmed) {
        Some(NumberShape::Integer) => {
            if let Ok(i) = trimmed.parse::<i64>() {
                return Value::from(i);
            }
        }
        Some(NumberShape::Float) => {
            if let Some(n) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
                return Value::Number(n);
            }
        }
        None => {}
    }
    Value::String(raw.to_string())
}

enum NumberShape {
    Integer,
    Float,
}

/// `[+-]? (0 | [1-9][0-9]*) ('.' [0-9]+)? ([eE] [+-]? [0-9]+)?`
fn classify_number(s: &str) -> Option<NumberShape> {
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_len = i - int_start;
    if int_len == 0 || (int_len > 1 && bytes[int_start] == b'0') {
        return None;
    }

    let mut shape = NumberShape::Integer;

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == frac_start {
            return None;
        }
        shape = NumberShape::Float;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return None;
        }
        shape = NumberShape::Float;
    }

    (i == bytes.len()).then_some(shape)
}
