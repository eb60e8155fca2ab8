//! EJS-style templates evaluated by an embedded Rhai script engine.
//!
//! # Tags
//!
//! | Tag            | Effect                                                     |
//! |----------------|------------------------------------------------------------|
//! | `<%= expr %>`  | evaluate, HTML-escape, emit                                |
//! | `<%- expr %>`  | evaluate, emit unescaped                                   |
//! | `<% code %>`   | run code (`if`, `for`, `let`, …) without emitting          |
//! | `<%_ code %>`  | as `<%`, also strips spaces/tabs before the tag            |
//! | `<%# text %>`  | comment, emits nothing                                     |
//! | `<%%`          | literal `<%`                                               |
//! | `-%>`          | close tag and drop one following newline                   |
//! | `_%>`          | close tag and drop following spaces/tabs and one newline   |
//!
//! The template is compiled into one Rhai script that appends to an output
//! buffer. Literal text never passes through the script source: it is kept
//! in an array and appended by index, so no escaping of template text is
//! needed. Scriptlets use Rhai syntax: `<% for item in items { %>` …
//! `<% } %>`.

use rhai::{Array, Dynamic, Engine, ImmutableString, Scope};
use serde_json::Value;

use crate::engine::TemplateEngine;

const OUT_VAR: &str = "ejs_out";
const CHUNKS_VAR: &str = "ejs_chunks";

/// Rhai engine with the output functions registered once.
pub struct EjsEngine {
    engine: Engine,
}

impl EjsEngine {
    pub fn new() -> Self {
        let mut engine = Engine::new();
        engine.register_fn("ejs_escape", |value: Dynamic| escape_html(&display(value)));
        engine.register_fn("ejs_raw", display);
        EjsEngine { engine }
    }
}

impl Default for EjsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for EjsEngine {
    fn name(&self) -> &'static str {
        "ejs"
    }

    fn render(&self, template: &str, data: &Value) -> Result<String, String> {
        let compiled = compile(template)?;

        let mut scope = Scope::new();
        if let Value::Object(map) = data {
            for (key, value) in map {
                if is_identifier(key) {
                    scope.push_dynamic(key.as_str(), to_dynamic(value)?);
                }
            }
        }
        scope.push_dynamic("locals", to_dynamic(data)?);
        scope.push(CHUNKS_VAR, compiled.chunks);
        scope.push(OUT_VAR, ImmutableString::new());

        self.engine
            .run_with_scope(&mut scope, &compiled.script)
            .map_err(|e| e.to_string())?;

        scope
            .get_value::<ImmutableString>(OUT_VAR)
            .map(|out| out.to_string())
            .ok_or_else(|| format!("template reassigned `{OUT_VAR}` to a non-string value"))
    }
}

fn to_dynamic(value: &Value) -> Result<Dynamic, String> {
    rhai::serde::to_dynamic(value).map_err(|e| e.to_string())
}

/// What `<%= %>` and `<%- %>` print: nothing for unit, the plain text for
/// strings, the Rhai display form for everything else.
fn display(value: Dynamic) -> String {
    if value.is_unit() {
        String::new()
    } else {
        value.to_string()
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    key != "_" && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// ---------------------------------------------------------------------------
// Template → script
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Compiled {
    script: String,
    chunks: Array,
}

#[derive(Debug, PartialEq, Eq)]
enum Segment {
    Text(String),
    Escaped(String),
    Raw(String),
    Code(String),
}

fn compile(template: &str) -> Result<Compiled, String> {
    let mut script = String::new();
    let mut chunks = Array::new();

    for segment in tokenize(template)? {
        match segment {
            Segment::Text(text) => {
                script.push_str(&format!("{OUT_VAR} += {CHUNKS_VAR}[{}];\n", chunks.len()));
                chunks.push(Dynamic::from(text));
            }
            Segment::Escaped(expr) => {
                script.push_str(&format!("{OUT_VAR} += ejs_escape(\n{expr}\n);\n"));
            }
            Segment::Raw(expr) => {
                script.push_str(&format!("{OUT_VAR} += ejs_raw(\n{expr}\n);\n"));
            }
            Segment::Code(code) => {
                script.push_str(&code);
                script.push('\n');
            }
        }
    }

    Ok(Compiled { script, chunks })
}

fn tokenize(template: &str) -> Result<Vec<Segment>, String> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut rest = template;

    while let Some(open) = rest.find("<%") {
        text.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];

        // `<%%` is an escaped opener.
        if let Some(after) = after_open.strip_prefix('%') {
            text.push_str("<%");
            rest = after;
            continue;
        }

        let (kind, body_start) = match after_open.chars().next() {
            Some('=') => ('=', 1),
            Some('-') => ('-', 1),
            Some('#') => ('#', 1),
            Some('_') => ('_', 1),
            _ => (' ', 0),
        };
        let body_and_rest = &after_open[body_start..];
        let close = body_and_rest.find("%>").ok_or_else(|| {
            format!("could not find matching close tag for \"<%{}\"", kind.to_string().trim())
        })?;

        let mut body = &body_and_rest[..close];
        rest = &body_and_rest[close + 2..];

        if let Some(trimmed) = body.strip_suffix('-') {
            body = trimmed;
            rest = strip_one_newline(rest);
        } else if let Some(trimmed) = body.strip_suffix('_') {
            body = trimmed;
            rest = strip_one_newline(rest.trim_start_matches([' ', '\t']));
        }

        if kind == '_' {
            let kept = text.trim_end_matches([' ', '\t']).len();
            text.truncate(kept);
        }

        if kind == '#' {
            continue;
        }

        if !text.is_empty() {
            segments.push(Segment::Text(std::mem::take(&mut text)));
        }
        let body = body.to_string();
        segments.push(match kind {
            '=' => Segment::Escaped(body),
            '-' => Segment::Raw(body),
            _ => Segment::Code(body),
        });
    }

    text.push_str(rest);
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    Ok(segments)
}

fn strip_one_newline(s: &str) -> &str {
    s.strip_prefix("\r\n")
        .or_else(|| s.strip_prefix('\n'))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(template: &str, data: Value) -> Result<String, String> {
        EjsEngine::new().render(template, &data)
    }

    #[test]
    fn escaped_and_raw_output() {
        let data = json!({"html": "<b>\"hi\" & 'bye'</b>"});
        assert_eq!(
            render("<%= html %>", data.clone()).unwrap(),
            "&lt;b&gt;&#34;hi&#34; &amp; &#39;bye&#39;&lt;/b&gt;"
        );
        assert_eq!(render("<%- html %>", data).unwrap(), "<b>\"hi\" & 'bye'</b>");
    }

    #[test]
    fn expressions_are_evaluated() {
        let data = json!({"a": 2, "b": 3, "name": "alice"});
        assert_eq!(render("<%= a * b + 1 %>", data.clone()).unwrap(), "7");
        assert_eq!(render("<%= name.to_upper() %>", data).unwrap(), "ALICE");
    }

    #[test]
    fn nested_paths_and_locals() {
        let data = json!({"user": {"name": "Alice"}, "dashed-key": "x"});
        assert_eq!(render("<%= user.name %>", data.clone()).unwrap(), "Alice");
        assert_eq!(render("<%= locals[\"dashed-key\"] %>", data).unwrap(), "x");
    }

    #[test]
    fn loops_and_conditionals_with_trim() {
        let template = "<% for t in tags { -%>\n- <%= t %>\n<% } -%>\n<% if admin { %>admin<% } %>";
        let out = render(template, json!({"tags": ["a", "b"], "admin": true})).unwrap();
        assert_eq!(out, "- a\n- b\nadmin");
    }

    #[test]
    fn whitespace_slurping_tags() {
        let template = "start\n    <%_ if true { _%>\nbody\n    <%_ } _%>\nend";
        assert_eq!(render(template, json!({})).unwrap(), "start\nbody\nend");
    }

    #[test]
    fn comments_and_literal_open() {
        let out = render("a<%# ignored %>b <%%= kept %>", json!({})).unwrap();
        assert_eq!(out, "ab <%= kept %>");
    }

    #[test]
    fn text_with_quotes_and_backslashes_is_verbatim() {
        let template = "say \"hi\" \\n ${x} `tick`";
        assert_eq!(render(template, json!({})).unwrap(), template);
    }

    #[test]
    fn unit_result_prints_nothing() {
        assert_eq!(render("[<%= () %>]", json!({})).unwrap(), "[]");
    }

    #[test]
    fn unknown_variable_is_error() {
        assert!(render("<%= missing %>", json!({})).is_err());
    }

    #[test]
    fn missing_key_through_locals_is_empty() {
        let data = json!({"name": "Alice"});
        assert_eq!(render("[<%= locals.nick %>]", data.clone()).unwrap(), "[]");
        assert_eq!(
            render("<% if type_of(locals.nick) == \"()\" { %>unset<% } else { %>set<% } %>", data).unwrap(),
            "unset"
        );
    }

    #[test]
    fn unterminated_tag_is_error() {
        let err = render("<%= name", json!({"name": "x"})).unwrap_err();
        assert!(err.contains("close tag"), "{err}");
    }

    #[test]
    fn tokenize_splits_segments() {
        assert_eq!(
            tokenize("a<%= x %>b<% y %>").unwrap(),
            vec![
                Segment::Text("a".into()),
                Segment::Escaped(" x ".into()),
                Segment::Text("b".into()),
                Segment::Code(" y ".into()),
            ]
        );
    }
}
