//! Source specifiers: where a config or template comes from.
//!
//! A specifier is a plain string supplied on the command line. It is
//! classified by prefix only:
//!
//! | Prefix                    | Variant                          |
//! |---------------------------|----------------------------------|
//! | `@`                       | [`SourceSpec::Shorthand`]        |
//! | `http://`, `https://`     | [`SourceSpec::RemoteUrl`]        |
//! | anything else             | [`SourceSpec::LocalPath`]        |
//!
//! The `@` check runs first, so `@repo/file` is never read from disk even if
//! a directory literally named `@repo` exists.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::SourceError;

/// Raw-content host used for `@repo/path` references.
pub const RAW_CONTENT_BASE: &str = "https://raw.githubusercontent.com";

/// Organization every shorthand reference resolves under.
pub const SHORTHAND_ORG: &str = "n-p-x";

/// Branch every shorthand reference resolves against.
pub const SHORTHAND_BRANCH: &str = "main";

/// A classified source specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// A file on the local filesystem.
    LocalPath(PathBuf),
    /// An `http://` or `https://` URL, fetched with a single GET.
    RemoteUrl(String),
    /// `@<repo>/<path>`, expanded to a raw-content URL.
    Shorthand { repo: String, path: String },
}

impl SourceSpec {
    /// Classify `spec` by prefix.
    ///
    /// Fails only for a malformed shorthand (`@`, `@repo`, `@repo/`).
    pub fn parse(spec: &str) -> Result<Self, SourceError> {
        if let Some(rest) = spec.strip_prefix('@') {
            let mut segments = rest.split('/');
            let repo = segments.next().unwrap_or_default();
            let path = segments.collect::<Vec<_>>().join("/");
            if repo.is_empty() || path.is_empty() {
                return Err(SourceError::InvalidShorthand {
                    spec: spec.to_string(),
                });
            }
            return Ok(SourceSpec::Shorthand {
                repo: repo.to_string(),
                path,
            });
        }

        if spec.starts_with("http://") || spec.starts_with("https://") {
            return Ok(SourceSpec::RemoteUrl(spec.to_string()));
        }

        Ok(SourceSpec::LocalPath(PathBuf::from(spec)))
    }

    /// Raw-content URL for a shorthand reference rooted at `base`.
    ///
    /// Returns `None` for the other variants.
    pub fn shorthand_url(&self, base: &str) -> Option<String> {
        match self {
            SourceSpec::Shorthand { repo, path } => Some(format!(
                "{}/{SHORTHAND_ORG}/{repo}/{SHORTHAND_BRANCH}/{path}",
                base.trim_end_matches('/')
            )),
            _ => None,
        }
    }
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceSpec::LocalPath(path) => write!(f, "{}", path.display()),
            SourceSpec::RemoteUrl(url) => f.write_str(url),
            SourceSpec::Shorthand { repo, path } => write!(f, "@{repo}/{path}"),
        }
    }
}

/// Lowercase extension of the last path component of `spec`, without the dot.
///
/// Works on the specifier string as given, so URLs and shorthand references
/// are treated like paths: `https://host/a/data.YAML` → `yaml`. Dotfiles
/// such as `.env` have no extension.
pub fn format_hint(spec: &str) -> Option<String> {
    Path::new(spec)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
