//! apparel core library: source specifiers and their resolution.
//!
//! - [`source`]: [`SourceSpec`] classification and format hints
//! - [`resolver`]: [`SourceResolver`]: local read, HTTP fetch, shorthand expansion
//! - [`error`]: [`SourceError`]

pub mod error;
pub mod resolver;
pub mod source;

pub use error::SourceError;
pub use resolver::SourceResolver;
pub use source::{format_hint, SourceSpec};
