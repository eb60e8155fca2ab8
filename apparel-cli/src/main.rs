//! apparel: fill templates with variables from config files.
//!
//! # Usage
//!
//! ```text
//! apparel <src> <tpl> [dst]
//! ```
//!
//! `src` and `tpl` accept a local path, an `http(s)://` URL, or an
//! `@<repo>/<path>` shorthand for a file in the shared template
//! repositories. Without `dst` the rendered text goes to stdout.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use apparel_pipeline::{Pipeline, Request};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "apparel",
    version,
    about = "Fill templates with variables from config files",
    long_about = None,
)]
struct Cli {
    /// Config source: local path, http(s) URL, or @<repo>/<path>.
    /// Format follows the extension (json, json5, yaml, yml, toml, xml).
    src: String,

    /// Template source: local path, http(s) URL, or @<repo>/<path>.
    /// Engine follows the extension (hbs, handlebars, liquid, ejs, jinja, j2).
    tpl: String,

    /// Output file. Rendered text goes to stdout when omitted.
    dst: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    init_tracing();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // `--help` and `--version` print to stdout and succeed; usage errors exit 1.
            let _ = err.print();
            std::process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };
    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let pipeline = Pipeline::new()?;
    let request = Request::new(cli.src, cli.tpl, cli.dst);
    let outcome = pipeline.run(
        &request,
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    )?;
    tracing::debug!(?outcome, "finished");
    Ok(())
}

/// Log to stderr, `warn` unless `RUST_LOG` says otherwise.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
