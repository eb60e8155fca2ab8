//! Error types for apparel-config.

use thiserror::Error;

/// Every config format funnels its failures into this one error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The format parser rejected the content.
    #[error("failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },
}
