//! Source descriptors for [`ConfigStore::load_source`](super::ConfigStore::load_source).
//!
//! - `file://<path>` - read a YAML (or `.json`) document from a file
//! - `env://<prefix>` - read process environment variables starting with `<prefix>`
//! - anything else is taken as a bare file path

use std::path::PathBuf;

const FILE_SCHEME: &str = "file://";
const ENV_SCHEME: &str = "env://";

/// A place configuration can be loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Structured document on disk
    File(PathBuf),
    /// Environment variables with the given name prefix
    Env(String),
}

impl Source {
    /// Parse a descriptor. Never fails: unknown forms are file paths.
    pub fn parse(descriptor: &str) -> Self {
        if let Some(path) = descriptor.strip_prefix(FILE_SCHEME) {
            Source::File(PathBuf::from(path))
        } else if let Some(prefix) = descriptor.strip_prefix(ENV_SCHEME) {
            Source::Env(prefix.to_string())
        } else {
            Source::File(PathBuf::from(descriptor))
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}{}", FILE_SCHEME, path.display()),
            Source::Env(prefix) => write!(f, "{}{}", ENV_SCHEME, prefix),
        }
    }
}
