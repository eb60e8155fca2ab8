//! Extension-keyed parser registry.
//!
//! | Extension       | Parser                                   |
//! |-----------------|------------------------------------------|
//! | `json`          | [`parse_json`]                           |
//! | `json5`         | [`parse_json5`]                          |
//! | `yml`, `yaml`   | [`parse_yaml`]                           |
//! | `toml`          | [`parse_toml`]                           |
//! | `xml`           | [`parse_xml`]                            |
//! | anything else   | [`parse_json_then_yaml`]                 |

use std::collections::HashMap;

use serde_json::Value;

use apparel_core::format_hint;

use crate::error::ConfigError;
use crate::formats::{
    parse_json, parse_json5, parse_json_then_yaml, parse_toml, parse_yaml, ParseFn,
};
use crate::xml::parse_xml;

/// Maps lowercase extensions to parse functions, with a fallback for the rest.
#[derive(Clone)]
pub struct ParserRegistry {
    parsers: HashMap<String, ParseFn>,
    fallback: ParseFn,
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut extensions: Vec<_> = self.parsers.keys().collect();
        extensions.sort();
        f.debug_struct("ParserRegistry")
            .field("extensions", &extensions)
            .finish_non_exhaustive()
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ParserRegistry {
    /// Registry with every built-in format.
    pub fn builtin() -> Self {
        let mut registry = ParserRegistry {
            parsers: HashMap::new(),
            fallback: parse_json_then_yaml,
        };
        registry.register("json", parse_json);
        registry.register("json5", parse_json5);
        registry.register("yml", parse_yaml);
        registry.register("yaml", parse_yaml);
        registry.register("toml", parse_toml);
        registry.register("xml", parse_xml);
        registry
    }

    /// Add or replace the parser for `extension` (case-insensitive, no dot).
    pub fn register(&mut self, extension: &str, parser: ParseFn) {
        self.parsers.insert(extension.to_ascii_lowercase(), parser);
    }

    /// Parser for `extension`, or the fallback when none is registered.
    pub fn parser_for(&self, extension: Option<&str>) -> ParseFn {
        extension
            .and_then(|ext| self.parsers.get(&ext.to_ascii_lowercase()))
            .copied()
            .unwrap_or(self.fallback)
    }

    /// Parse `content` loaded from `source`, choosing the format by extension.
    ///
    /// `source` is the specifier the content came from; it picks the parser
    /// and names the file in the error.
    pub fn parse(&self, content: &str, source: &str) -> Result<Value, ConfigError> {
        let hint = format_hint(source);
        tracing::debug!(source, format = hint.as_deref().unwrap_or("<fallback>"), "parsing config");
        self.parser_for(hint.as_deref())(content).map_err(|message| ConfigError::Parse {
            path: source.to_string(),
            message,
        })
    }
}
