//! The five-stage run: resolve config, parse it, resolve template, render,
//! emit.
//!
//! ```text
//! Start → ConfigResolved → ConfigParsed → TemplateResolved → Rendered → Done
//! ```
//!
//! There is no branching and no retry. The first failing stage ends the run
//! and nothing is written to the output sink.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use apparel_config::ParserRegistry;
use apparel_core::SourceResolver;
use apparel_renderer::Renderer;

use crate::error::PipelineError;
use crate::writer;

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Position of a run in the stage sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    ConfigResolved,
    ConfigParsed,
    TemplateResolved,
    Rendered,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::ConfigResolved => "config-resolved",
            Stage::ConfigParsed => "config-parsed",
            Stage::TemplateResolved => "template-resolved",
            Stage::Rendered => "rendered",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Request / outcome
// ---------------------------------------------------------------------------

/// One invocation's inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Config source specifier.
    pub src: String,
    /// Template source specifier.
    pub tpl: String,
    /// Output file; `None` sends the result to the data stream.
    pub dst: Option<PathBuf>,
}

impl Request {
    pub fn new(src: impl Into<String>, tpl: impl Into<String>, dst: Option<PathBuf>) -> Self {
        Request {
            src: src.into(),
            tpl: tpl.into(),
            dst,
        }
    }
}

/// Where the rendered text ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Written to this file.
    Written { path: PathBuf, bytes: usize },
    /// Written to the data stream.
    Printed { bytes: usize },
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Resolver, parser registry and renderer, built once and shared by
/// reference for the run.
#[derive(Debug)]
pub struct Pipeline {
    resolver: SourceResolver,
    parsers: ParserRegistry,
    renderer: Renderer,
}

impl Pipeline {
    /// Pipeline with the public shorthand host and every built-in format.
    pub fn new() -> Result<Self, PipelineError> {
        Ok(Self::from_parts(
            SourceResolver::new(),
            ParserRegistry::builtin(),
            Renderer::new()?,
        ))
    }

    /// Pipeline over caller-supplied components.
    pub fn from_parts(resolver: SourceResolver, parsers: ParserRegistry, renderer: Renderer) -> Self {
        Pipeline {
            resolver,
            parsers,
            renderer,
        }
    }

    /// Execute `request`.
    ///
    /// Progress lines go to `progress`; when `request.dst` is `None` the
    /// rendered text goes to `out` exactly as the engine produced it.
    /// Progress write failures are ignored.
    pub fn run<O, P>(
        &self,
        request: &Request,
        out: &mut O,
        progress: &mut P,
    ) -> Result<Outcome, PipelineError>
    where
        O: Write + ?Sized,
        P: Write + ?Sized,
    {
        let mut stage = Stage::Start;

        let _ = writeln!(progress, "Loading config from: {}", request.src);
        let config_text = self.resolver.resolve_str(&request.src)?;
        advance(&mut stage, Stage::ConfigResolved);

        let data = self.parsers.parse(&config_text, &request.src)?;
        advance(&mut stage, Stage::ConfigParsed);

        let _ = writeln!(progress, "Loading template from: {}", request.tpl);
        let template = self.resolver.resolve_str(&request.tpl)?;
        advance(&mut stage, Stage::TemplateResolved);

        let _ = writeln!(progress, "Rendering template...");
        let rendered = self.renderer.render(&template, &request.tpl, &data)?;
        advance(&mut stage, Stage::Rendered);

        let outcome = match &request.dst {
            Some(path) => emit_file(path, &rendered, progress)?,
            None => {
                writer::write_stream(out, &rendered)?;
                Outcome::Printed {
                    bytes: rendered.len(),
                }
            }
        };
        advance(&mut stage, Stage::Done);
        Ok(outcome)
    }
}

fn emit_file<P: Write + ?Sized>(
    path: &Path,
    rendered: &str,
    progress: &mut P,
) -> Result<Outcome, PipelineError> {
    writer::write_file(path, rendered)?;
    let _ = writeln!(progress, "Output written to: {}", path.display());
    Ok(Outcome::Written {
        path: path.to_path_buf(),
        bytes: rendered.len(),
    })
}

fn advance(stage: &mut Stage, next: Stage) {
    tracing::debug!(from = %stage, to = %next, "stage transition");
    *stage = next;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path.display().to_string()
    }

    fn run(request: &Request) -> (Result<Outcome, PipelineError>, String, String) {
        let pipeline = Pipeline::new().unwrap();
        let mut out = Vec::new();
        let mut progress = Vec::new();
        let result = pipeline.run(request, &mut out, &mut progress);
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(progress).unwrap(),
        )
    }

    #[test]
    fn renders_to_stream_with_progress_lines() {
        let dir = TempDir::new().unwrap();
        let src = write(&dir, "data.json", r#"{"name": "Alice"}"#);
        let tpl = write(&dir, "tpl.hbs", "Hello, {{name}}!");

        let (result, out, progress) = run(&Request::new(&src, &tpl, None));

        assert_eq!(result.unwrap(), Outcome::Printed { bytes: 13 });
        assert_eq!(out, "Hello, Alice!");
        assert_eq!(
            progress,
            format!("Loading config from: {src}\nLoading template from: {tpl}\nRendering template...\n")
        );
    }

    #[test]
    fn renders_to_file_and_confirms_on_progress() {
        let dir = TempDir::new().unwrap();
        let src = write(&dir, "data.yaml", "items: [a, b]\n");
        let tpl = write(&dir, "list.liquid", "{% for i in items %}{{ i }}\n{% endfor %}");
        let dst = dir.path().join("out.txt");

        let (result, out, progress) = run(&Request::new(&src, &tpl, Some(dst.clone())));

        assert_eq!(
            result.unwrap(),
            Outcome::Written {
                path: dst.clone(),
                bytes: 4
            }
        );
        assert!(out.is_empty());
        assert_eq!(std::fs::read_to_string(&dst).unwrap(), "a\nb\n");
        assert!(progress.ends_with(&format!("Output written to: {}\n", dst.display())));
    }

    #[test]
    fn missing_config_stops_before_template() {
        let dir = TempDir::new().unwrap();
        let tpl = write(&dir, "tpl.hbs", "x");
        let missing = dir.path().join("nope.json").display().to_string();

        let (result, out, progress) = run(&Request::new(&missing, &tpl, None));

        assert!(matches!(result, Err(PipelineError::Source(_))));
        assert!(out.is_empty());
        assert!(!progress.contains("Loading template from"));
    }

    #[test]
    fn parse_failure_is_config_error() {
        let dir = TempDir::new().unwrap();
        let src = write(&dir, "data.toml", "= nope");
        let tpl = write(&dir, "tpl.hbs", "x");

        let (result, out, _) = run(&Request::new(&src, &tpl, None));

        assert!(matches!(result, Err(PipelineError::Config(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn render_failure_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let src = write(&dir, "data.json", "{}");
        let tpl = write(&dir, "tpl.ejs", "<%= missing %>");
        let dst = dir.path().join("out.txt");

        let (result, out, progress) = run(&Request::new(&src, &tpl, Some(dst.clone())));

        assert!(matches!(result, Err(PipelineError::Render(_))));
        assert!(out.is_empty());
        assert!(!dst.exists());
        assert!(!progress.contains("Output written to"));
    }

    #[test]
    fn unwritable_destination_is_output_error() {
        let dir = TempDir::new().unwrap();
        let src = write(&dir, "data.json", "{}");
        let tpl = write(&dir, "tpl.hbs", "x");
        let dst = dir.path().join("no-such-dir").join("out.txt");

        let (result, _, progress) = run(&Request::new(&src, &tpl, Some(dst)));

        assert!(matches!(result, Err(PipelineError::OutputWrite { .. })));
        assert!(!progress.contains("Output written to"));
    }

    #[test]
    fn stage_names() {
        assert_eq!(Stage::TemplateResolved.to_string(), "template-resolved");
        assert_eq!(Stage::Done.to_string(), "done");
    }
}
