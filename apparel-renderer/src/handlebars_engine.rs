//! Handlebars engine with the helper library pre-registered.

use handlebars::Handlebars;
use serde_json::Value;

use crate::engine::TemplateEngine;
use crate::helpers;

/// Handlebars registry configured once with [`helpers::register_all`].
///
/// Missing variables render as empty strings and `{{ }}` output is
/// HTML-escaped, as in stock Handlebars.
pub struct HandlebarsEngine {
    registry: Handlebars<'static>,
}

impl HandlebarsEngine {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        helpers::register_all(&mut registry);
        HandlebarsEngine { registry }
    }
}

impl Default for HandlebarsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for HandlebarsEngine {
    fn name(&self) -> &'static str {
        "handlebars"
    }

    fn render(&self, template: &str, data: &Value) -> Result<String, String> {
        self.registry
            .render_template(template, data)
            .map_err(|e| e.to_string())
    }
}
