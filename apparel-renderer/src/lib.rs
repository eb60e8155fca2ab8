//! # apparel-renderer
//!
//! Renders template text against a config value. The template language is
//! picked from the template source's file extension; anything unrecognised
//! is treated as Handlebars.
//!
//! ## Usage
//!
//! ```rust
//! use apparel_renderer::Renderer;
//! use serde_json::json;
//!
//! let renderer = Renderer::new().unwrap();
//! let out = renderer
//!     .render("Hello, {{name}}!", "greeting.hbs", &json!({"name": "Alice"}))
//!     .unwrap();
//! assert_eq!(out, "Hello, Alice!");
//! ```

pub mod ejs;
pub mod engine;
pub mod error;
pub mod handlebars_engine;
pub mod helpers;
pub mod jinja;
mod lenient;
pub mod liquid_engine;

pub use ejs::EjsEngine;
pub use engine::{Renderer, TemplateEngine};
pub use error::RenderError;
pub use handlebars_engine::HandlebarsEngine;
pub use jinja::JinjaEngine;
pub use liquid_engine::LiquidEngine;
