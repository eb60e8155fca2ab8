//! Jinja-style engine backed by Tera, autoescaping off.

use std::error::Error as _;

use serde_json::Value;
use tera::{Context, Tera};

use crate::engine::TemplateEngine;
use crate::helpers;
use crate::lenient;

const INLINE_NAME: &str = "__apparel_inline";

/// Tera instance configured once: no autoescaping for any template name,
/// plus the case-conversion filters. Missing variables render as empty.
pub struct JinjaEngine {
    tera: Tera,
}

impl JinjaEngine {
    pub fn new() -> Self {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.register_filter("snake_case", helpers::snake_case);
        tera.register_filter("pascal_case", helpers::pascal_case);
        tera.register_filter("camel_case", helpers::camel_case);
        tera.register_filter("kebab_case", helpers::kebab_case);
        JinjaEngine { tera }
    }
}

impl Default for JinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for JinjaEngine {
    fn name(&self) -> &'static str {
        "jinja"
    }

    fn render(&self, template: &str, data: &Value) -> Result<String, String> {
        // Adding a template needs `&mut`; work on a copy so the shared instance stays untouched.
        let mut inline = self.tera.clone();
        inline
            .add_raw_template(INLINE_NAME, template)
            .map_err(|e| error_chain(&e))?;

        lenient::render_filling_missing(
            data,
            |data| {
                let context = Context::from_value(data.clone()).map_err(|e| error_chain(&e))?;
                inline
                    .render(INLINE_NAME, &context)
                    .map_err(|e| error_chain(&e))
            },
            lenient::tera_missing_variable,
        )
    }
}

/// Tera keeps the useful part of its message in the source chain.
fn error_chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
