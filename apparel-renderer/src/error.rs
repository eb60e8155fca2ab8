//! Error types for apparel-renderer.

use thiserror::Error;

/// All errors that can arise from template rendering operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// An engine rejected the template or failed while running it.
    #[error("failed to render template {path}: {message}")]
    Render { path: String, message: String },

    /// An engine could not be constructed.
    #[error("failed to initialise {engine} engine: {message}")]
    Setup {
        engine: &'static str,
        message: String,
    },
}
