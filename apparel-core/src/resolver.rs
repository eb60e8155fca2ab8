//! Turn a [`SourceSpec`] into raw text.
//!
//! Local paths are read from disk, URLs are fetched with one blocking GET,
//! and shorthand references are expanded to a raw-content URL first. There
//! are no retries and no cache: one failed attempt ends the run.

use std::io::Read;

use crate::error::{io_err, SourceError};
use crate::source::{SourceSpec, RAW_CONTENT_BASE};

/// Resolves source specifiers to their text content.
///
/// The raw-content base used for shorthand references is fixed to
/// [`RAW_CONTENT_BASE`] by [`SourceResolver::new`]; [`SourceResolver::with_raw_base`]
/// exists so tests can point shorthand resolution at a local server.
pub struct SourceResolver {
    agent: ureq::Agent,
    raw_base: String,
}

impl std::fmt::Debug for SourceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceResolver")
            .field("raw_base", &self.raw_base)
            .finish_non_exhaustive()
    }
}

impl Default for SourceResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceResolver {
    /// Resolver targeting the public raw-content host.
    pub fn new() -> Self {
        Self::with_raw_base(RAW_CONTENT_BASE)
    }

    /// Resolver whose shorthand references expand under `raw_base`.
    pub fn with_raw_base(raw_base: impl Into<String>) -> Self {
        SourceResolver {
            agent: ureq::AgentBuilder::new().build(),
            raw_base: raw_base.into(),
        }
    }

    /// Classify `spec` and return its content.
    pub fn resolve_str(&self, spec: &str) -> Result<String, SourceError> {
        self.resolve(&SourceSpec::parse(spec)?)
    }

    /// Return the content behind an already-classified specifier.
    pub fn resolve(&self, spec: &SourceSpec) -> Result<String, SourceError> {
        match spec {
            SourceSpec::LocalPath(path) => {
                tracing::debug!(path = %path.display(), "reading local source");
                std::fs::read_to_string(path).map_err(|e| io_err(path, e))
            }
            SourceSpec::RemoteUrl(url) => self.fetch(url),
            SourceSpec::Shorthand { .. } => {
                let url = spec
                    .shorthand_url(&self.raw_base)
                    .ok_or_else(|| SourceError::InvalidShorthand {
                        spec: spec.to_string(),
                    })?;
                tracing::debug!(shorthand = %spec, url = %url, "expanded shorthand reference");
                self.fetch(&url)
            }
        }
    }

    fn fetch(&self, url: &str) -> Result<String, SourceError> {
        tracing::debug!(url, "fetching remote source");
        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                return Err(SourceError::Fetch {
                    url: url.to_string(),
                    status,
                    reason: response.status_text().to_string(),
                });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(SourceError::Transport {
                    url: url.to_string(),
                    message: transport.to_string(),
                });
            }
        };

        let mut body = String::new();
        response
            .into_reader()
            .read_to_string(&mut body)
            .map_err(|source| SourceError::Body {
                url: url.to_string(),
                source,
            })?;
        tracing::debug!(url, bytes = body.len(), "fetched remote source");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use tempfile::TempDir;

    #[test]
    fn reads_local_file_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "{\"name\": \"Alice\"}\n").unwrap();

        let content = SourceResolver::new()
            .resolve_str(path.to_str().unwrap())
            .unwrap();
        assert_eq!(content, "{\"name\": \"Alice\"}\n");
    }

    #[test]
    fn missing_local_file_is_io_error_with_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.json");

        let err = SourceResolver::new()
            .resolve_str(path.to_str().unwrap())
            .unwrap_err();
        match &err {
            SourceError::Io { path: p, source } => {
                assert_eq!(p, &path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected Io error, got {other:?}"),
        }
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn non_utf8_local_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("binary.json");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let err = SourceResolver::new()
            .resolve_str(path.to_str().unwrap())
            .unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[test]
    fn fetches_remote_body() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/config.yaml")
            .with_status(200)
            .with_body("name: Alice\n")
            .create();

        let url = format!("{}/config.yaml", server.url());
        let content = SourceResolver::new().resolve_str(&url).unwrap();

        assert_eq!(content, "name: Alice\n");
        mock.assert();
    }

    #[test]
    fn non_success_status_is_fetch_error() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/missing.json")
            .with_status(404)
            .with_body("nope")
            .expect(1)
            .create();

        let url = format!("{}/missing.json", server.url());
        let err = SourceResolver::new().resolve_str(&url).unwrap_err();

        match &err {
            SourceError::Fetch { status, reason, .. } => {
                assert_eq!(*status, 404);
                assert_eq!(reason, "Not Found");
            }
            other => panic!("expected Fetch error, got {other:?}"),
        }
        assert!(err.to_string().contains("404 Not Found"));
        // Exactly one request: no retry on failure.
        mock.assert();
    }

    #[test]
    fn server_error_is_not_retried() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/flaky.json")
            .with_status(503)
            .expect(1)
            .create();

        let url = format!("{}/flaky.json", server.url());
        let err = SourceResolver::new().resolve_str(&url).unwrap_err();

        assert!(matches!(err, SourceError::Fetch { status: 503, .. }));
        mock.assert();
    }

    #[test]
    fn shorthand_expands_under_org_and_main_branch() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/n-p-x/templates/main/web/page.hbs")
            .with_status(200)
            .with_body("Hello, {{name}}!")
            .create();

        let resolver = SourceResolver::with_raw_base(server.url());
        let content = resolver.resolve_str("@templates/web/page.hbs").unwrap();

        assert_eq!(content, "Hello, {{name}}!");
        mock.assert();
    }

    #[test]
    fn unreachable_host_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let err = SourceResolver::new()
            .resolve_str("http://127.0.0.1:9/data.json")
            .unwrap_err();
        assert!(matches!(err, SourceError::Transport { .. }));
    }
}
