//! Hierarchical configuration store.
//!
//! Structured documents are flattened into a map of dotted keys:
//!
//! ```yaml
//! config:
//!   server:
//!     port: 5678
//! ```
//!
//! becomes `config.server.port = "5678"`. Values are kept as text and
//! converted on read through [`FromConfigValue`].
//!
//! ## Sources
//! - `file://<path>` - YAML document (JSON when the file ends in `.json`)
//! - `env://<prefix>` - environment variables, `PREFIX_a_b=v` becomes `a.b = v`
//! - any other string - a bare file path
//!
//! ## Sequences
//! Lists are not split per element. A sequence is stored as one value in
//! flow style (`[a, b]`) and is read back as a string.

pub mod document;
mod flatten;
pub mod global;
mod loader;
mod source;
mod store;
mod value;

pub use document::{DocumentFormat, Node};
pub use flatten::{SEPARATOR, flatten, unflatten};
pub use loader::ENV_SEPARATOR;
pub use source::Source;
pub use store::ConfigStore;
pub use value::{FromConfigValue, parse_magnitude};
