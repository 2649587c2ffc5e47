//! Structured error types for configuration loading and lookup.

use serde::Serialize;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Lookup errors
    KeyNotFound,

    // Coercion errors
    InvalidBoolValue,
    InvalidIntegerValue,

    // Document errors
    MalformedDocument,

    // Source errors
    FileOpenError,
    FileReadError,
    NoSourceLoaded,
}

/// Errors raised by [`ConfigStore`](crate::config::ConfigStore) operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No such key: {0}")]
    KeyNotFound(String),

    #[error("Invalid bool value for {key}: {value}")]
    InvalidBoolValue { key: String, value: String },

    #[error("Invalid integer value for {key}: {value}")]
    InvalidIntegerValue { key: String, value: String },

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Failed to open file {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read the content of file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Need at least one loadable source, none of [{}] could be loaded", .0.join(", "))]
    NoSourceLoaded(Vec<String>),
}

impl ConfigError {
    /// Stable code for this error kind.
    pub fn code(&self) -> ErrorCode {
        match self {
            ConfigError::KeyNotFound(_) => ErrorCode::KeyNotFound,
            ConfigError::InvalidBoolValue { .. } => ErrorCode::InvalidBoolValue,
            ConfigError::InvalidIntegerValue { .. } => ErrorCode::InvalidIntegerValue,
            ConfigError::MalformedDocument(_) => ErrorCode::MalformedDocument,
            ConfigError::FileOpen { .. } => ErrorCode::FileOpenError,
            ConfigError::FileRead { .. } => ErrorCode::FileReadError,
            ConfigError::NoSourceLoaded(_) => ErrorCode::NoSourceLoaded,
        }
    }

    /// The OS-level error code behind a file failure, if any.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            ConfigError::FileOpen { source, .. } | ConfigError::FileRead { source, .. } => {
                source.raw_os_error()
            }
            _ => None,
        }
    }

    pub fn is_key_not_found(&self) -> bool {
        matches!(self, ConfigError::KeyNotFound(_))
    }

    // Convenience constructors

    pub fn malformed(reason: impl Into<String>) -> Self {
        ConfigError::MalformedDocument(reason.into())
    }

    pub fn invalid_bool(key: &str, value: &str) -> Self {
        ConfigError::InvalidBoolValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub fn invalid_integer(key: &str, value: &str) -> Self {
        ConfigError::InvalidIntegerValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::malformed(err.to_string())
    }
}

impl From<yaml_rust2::scanner::ScanError> for ConfigError {
    fn from(err: yaml_rust2::scanner::ScanError) -> Self {
        ConfigError::malformed(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::malformed(err.to_string())
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_variants() {
        assert_eq!(
            ConfigError::KeyNotFound("a.b".into()).code(),
            ErrorCode::KeyNotFound
        );
        assert_eq!(
            ConfigError::invalid_bool("k", "maybe").code(),
            ErrorCode::InvalidBoolValue
        );
        assert_eq!(
            ConfigError::invalid_integer("k", "1x").code(),
            ErrorCode::InvalidIntegerValue
        );
        assert_eq!(
            ConfigError::NoSourceLoaded(vec![]).code(),
            ErrorCode::NoSourceLoaded
        );
    }

    #[test]
    fn test_code_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&ErrorCode::InvalidIntegerValue).unwrap();
        assert_eq!(json, "\"INVALID_INTEGER_VALUE\"");
    }

    #[test]
    fn test_raw_os_error_only_for_file_errors() {
        let err = ConfigError::FileOpen {
            path: PathBuf::from("missing.yaml"),
            source: io::Error::from_raw_os_error(2),
        };
        assert_eq!(err.raw_os_error(), Some(2));
        assert_eq!(ConfigError::KeyNotFound("x".into()).raw_os_error(), None);
    }

    #[test]
    fn test_no_source_message_lists_sources() {
        let err = ConfigError::NoSourceLoaded(vec!["a.yaml".into(), "env://APP_".into()]);
        assert!(err.to_string().contains("a.yaml, env://APP_"));
    }
}
