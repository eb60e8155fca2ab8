//! Error types for apparel-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while turning a source specifier into text.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Local file missing, unreadable, or not valid UTF-8.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The remote host answered with a non-success status.
    #[error("failed to fetch {url}: {status} {reason}")]
    Fetch {
        url: String,
        status: u16,
        reason: String,
    },

    /// The request never produced a response (DNS, refused connection, TLS).
    #[error("failed to fetch {url}: {message}")]
    Transport { url: String, message: String },

    /// The response body could not be read as UTF-8 text.
    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// `@` was given without a repository or without a path inside it.
    #[error("invalid shorthand reference '{spec}': expected @<repo>/<path>")]
    InvalidShorthand { spec: String },
}

/// Convenience constructor for [`SourceError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SourceError {
    SourceError::Io {
        path: path.into(),
        source,
    }
}
