//! dotcfg: hierarchical configuration with dotted-path keys.
//!
//! This module exports the core components for testing and integration.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;

pub use config::ConfigStore;
pub use error::{ConfigError, ConfigResult, ErrorCode};
