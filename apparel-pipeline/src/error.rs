//! Error types for apparel-pipeline.

use thiserror::Error;

use apparel_config::ConfigError;
use apparel_core::SourceError;
use apparel_renderer::RenderError;

/// Every way a run can end early.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Config or template source could not be read or fetched.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Config text was rejected by its format parser.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The template engine failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The rendered text could not be written to its destination.
    #[error("failed to write output to {target}: {source}")]
    OutputWrite {
        target: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`PipelineError::OutputWrite`].
pub(crate) fn write_err(target: impl Into<String>, source: std::io::Error) -> PipelineError {
    PipelineError::OutputWrite {
        target: target.into(),
        source,
    }
}
