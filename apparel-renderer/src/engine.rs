//! [`TemplateEngine`] trait and the extension-keyed [`Renderer`].
//!
//! # Dispatch
//!
//! | Extension              | Engine                |
//! |------------------------|-----------------------|
//! | `hbs`, `handlebars`    | [`HandlebarsEngine`]  |
//! | `liquid`               | [`LiquidEngine`]      |
//! | `ejs`                  | [`EjsEngine`]         |
//! | `jinja`, `j2`          | [`JinjaEngine`]       |
//! | anything else          | [`HandlebarsEngine`]  |

use std::collections::HashMap;

use serde_json::Value;

use apparel_core::format_hint;

use crate::ejs::EjsEngine;
use crate::error::RenderError;
use crate::handlebars_engine::HandlebarsEngine;
use crate::jinja::JinjaEngine;
use crate::liquid_engine::LiquidEngine;

/// One template language.
///
/// Implementations hold only configuration fixed at construction; a render
/// call never mutates the engine.
pub trait TemplateEngine {
    /// Short engine name used in logs.
    fn name(&self) -> &'static str;

    /// Render `template` against `data`, returning the engine's message on failure.
    fn render(&self, template: &str, data: &Value) -> Result<String, String>;
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Extension-keyed engine registry.
///
/// Build once with [`Renderer::new`] and reuse; engines are shared between
/// all extensions that map to them.
pub struct Renderer {
    engines: Vec<Box<dyn TemplateEngine>>,
    by_extension: HashMap<String, usize>,
    fallback: usize,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut extensions: Vec<_> = self.by_extension.keys().collect();
        extensions.sort();
        f.debug_struct("Renderer")
            .field("engines", &self.engines.iter().map(|e| e.name()).collect::<Vec<_>>())
            .field("extensions", &extensions)
            .field("fallback", &self.engines[self.fallback].name())
            .finish()
    }
}

impl Renderer {
    /// Construct a [`Renderer`] with every built-in engine.
    ///
    /// Helper registration and autoescape policy happen here, once.
    pub fn new() -> Result<Self, RenderError> {
        let mut renderer = Renderer {
            engines: vec![Box::new(HandlebarsEngine::new())],
            by_extension: HashMap::new(),
            fallback: 0,
        };
        renderer.by_extension.insert("hbs".to_string(), 0);
        renderer.by_extension.insert("handlebars".to_string(), 0);

        renderer.register(&["liquid"], Box::new(LiquidEngine::new()?));
        renderer.register(&["ejs"], Box::new(EjsEngine::new()));
        renderer.register(&["jinja", "j2"], Box::new(JinjaEngine::new()));
        Ok(renderer)
    }

    /// Route `extensions` (case-insensitive, no dot) to `engine`.
    pub fn register(&mut self, extensions: &[&str], engine: Box<dyn TemplateEngine>) {
        let index = self.engines.len();
        self.engines.push(engine);
        for ext in extensions {
            self.by_extension.insert(ext.to_ascii_lowercase(), index);
        }
    }

    /// Engine for `extension`, or the Handlebars fallback.
    pub fn engine_for(&self, extension: Option<&str>) -> &dyn TemplateEngine {
        let index = extension
            .and_then(|ext| self.by_extension.get(&ext.to_ascii_lowercase()))
            .copied()
            .unwrap_or(self.fallback);
        self.engines[index].as_ref()
    }

    /// Render `template`, loaded from `source`, against `data`.
    ///
    /// `source` picks the engine by extension and names the template in errors.
    pub fn render(&self, template: &str, source: &str, data: &Value) -> Result<String, RenderError> {
        let hint = format_hint(source);
        let engine = self.engine_for(hint.as_deref());
        tracing::debug!(source, engine = engine.name(), "rendering template");
        engine
            .render(template, data)
            .map_err(|message| RenderError::Render {
                path: source.to_string(),
                message,
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
