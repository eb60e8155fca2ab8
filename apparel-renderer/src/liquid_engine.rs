//! Liquid engine.

use liquid::{Parser, ParserBuilder};
use serde_json::Value;

use crate::engine::TemplateEngine;
use crate::error::RenderError;
use crate::lenient;

/// Liquid parser with the standard tags and filters.
///
/// Each call parses and renders in one step; nothing is kept between calls.
/// Missing variables render as empty.
pub struct LiquidEngine {
    parser: Parser,
}

impl LiquidEngine {
    pub fn new() -> Result<Self, RenderError> {
        let parser = ParserBuilder::with_stdlib()
            .build()
            .map_err(|e| RenderError::Setup {
                engine: "liquid",
                message: e.to_string(),
            })?;
        Ok(LiquidEngine { parser })
    }
}

impl TemplateEngine for LiquidEngine {
    fn name(&self) -> &'static str {
        "liquid"
    }

    fn render(&self, template: &str, data: &Value) -> Result<String, String> {
        let template = self.parser.parse(template).map_err(|e| e.to_string())?;
        // Liquid globals must be an object; other top-level shapes expose nothing.
        lenient::render_filling_missing(
            data,
            |data| {
                let globals = liquid::model::to_object(data).map_err(|e| e.to_string())?;
                template.render(&globals).map_err(|e| e.to_string())
            },
            lenient::liquid_missing_variable,
        )
    }
}
