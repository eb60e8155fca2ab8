//! # apparel-pipeline
//!
//! Drives one invocation: resolve the config source, parse it, resolve the
//! template source, render, then write to a file or the data stream.
//!
//! ```rust,no_run
//! use apparel_pipeline::{Pipeline, Request};
//!
//! let pipeline = Pipeline::new().unwrap();
//! let request = Request::new("data.json", "page.hbs", None);
//! pipeline
//!     .run(&request, &mut std::io::stdout(), &mut std::io::stderr())
//!     .unwrap();
//! ```

pub mod error;
pub mod pipeline;
pub mod writer;

pub use error::PipelineError;
pub use pipeline::{Outcome, Pipeline, Request, Stage};
