//! # apparel-config
//!
//! Parses configuration text into the JSON-shaped data model handed to
//! templates. The format is picked from the source's file extension.
//!
//! ```rust
//! use apparel_config::ParserRegistry;
//!
//! let registry = ParserRegistry::builtin();
//! let data = registry.parse("name: Alice\n", "people.yaml").unwrap();
//! assert_eq!(data["name"], "Alice");
//! ```

pub mod error;
pub mod formats;
pub mod registry;
pub mod xml;

pub use error::ConfigError;
pub use formats::ParseFn;
pub use registry::ParserRegistry;
