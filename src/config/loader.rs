//! Loading documents, files and environment variables into a store.
//!
//! Sources are layered by plain key overwrite: whatever is loaded last wins.
//! [`ConfigStore::load_sources`] walks its list backwards so that the first
//! listed source has the final say, which is how an override file is put in
//! front of a defaults file.

use super::document::{self, DocumentFormat, Node};
use super::flatten::{SEPARATOR, flatten_into};
use super::source::Source;
use super::store::ConfigStore;
use crate::error::{ConfigError, ConfigResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Separator used in environment variable names in place of `.`.
pub const ENV_SEPARATOR: char = '_';

impl ConfigStore {
    /// Load YAML text.
    pub fn load_str(&mut self, text: &str) -> ConfigResult<()> {
        self.load_str_as(text, DocumentFormat::Yaml)
    }

    /// Load text in the given format.
    ///
    /// Every document is parsed before any entry is written, so a failed
    /// load leaves the store untouched. Later documents overwrite earlier
    /// ones. Empty documents contribute nothing.
    pub fn load_str_as(&mut self, text: &str, format: DocumentFormat) -> ConfigResult<()> {
        let documents = document::parse(text, format)?;
        let before = self.items.len();
        for node in documents.iter().filter(|node| **node != Node::Null) {
            flatten_into(&mut self.items, "", node);
        }
        debug!(
            %format,
            documents = documents.len(),
            new_keys = self.items.len() - before,
            "Loaded configuration text"
        );
        Ok(())
    }

    /// Load a structured document from a file.
    ///
    /// Files ending in `.json` are parsed as JSON, everything else as YAML.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|source| ConfigError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let mut text = String::new();
        file.read_to_string(&mut text)
            .map_err(|source| ConfigError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
        self.load_str_as(&text, DocumentFormat::from_path(path))?;
        debug!(path = %path.display(), "Loaded configuration file");
        Ok(())
    }

    /// Load process environment variables whose names start with `prefix`.
    ///
    /// Variables that are not valid UTF-8 are skipped. Returns the number of
    /// entries written.
    pub fn load_env(&mut self, prefix: &str) -> usize {
        let vars = std::env::vars_os()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)));
        self.load_env_from(prefix, vars)
    }

    /// Load `NAME=VALUE` pairs whose names start with `prefix`.
    ///
    /// The prefix is stripped and every `_` in the rest of the name becomes
    /// `.`, so `APP_server_port` under prefix `APP_` is stored as
    /// `server.port`. Values are stored verbatim. Names that would produce an
    /// empty key segment (`APP_a__b`, `APP_a_`, or the bare prefix) are
    /// skipped.
    pub fn load_env_from<I, K, V>(&mut self, prefix: &str, vars: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut count = 0;
        for (name, value) in vars {
            let Some(rest) = name.as_ref().strip_prefix(prefix) else {
                continue;
            };
            if rest.split(ENV_SEPARATOR).any(str::is_empty) {
                debug!(name = %name.as_ref(), "Skipping variable with an empty key segment");
                continue;
            }
            let key = rest.replace(ENV_SEPARATOR, &SEPARATOR.to_string());
            self.items.insert(key, value.into());
            count += 1;
        }
        debug!(prefix = %prefix, count, "Loaded environment variables");
        count
    }

    /// Load one source descriptor (`file://`, `env://` or a bare path).
    pub fn load_source(&mut self, descriptor: &str) -> ConfigResult<()> {
        match Source::parse(descriptor) {
            Source::File(path) => self.load_file(path),
            Source::Env(prefix) => {
                self.load_env(&prefix);
                Ok(())
            }
        }
    }

    /// Load several sources, giving the first listed source priority.
    ///
    /// Sources are loaded from the last to the first. A source that fails is
    /// skipped; only when every source fails (or none is given) does this
    /// return `NoSourceLoaded`.
    pub fn load_sources<I, S>(&mut self, descriptors: I) -> ConfigResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let descriptors: Vec<String> = descriptors
            .into_iter()
            .map(|d| d.as_ref().to_string())
            .collect();

        let mut loaded = false;
        for descriptor in descriptors.iter().rev() {
            match self.load_source(descriptor) {
                Ok(()) => loaded = true,
                // A missing layer is the normal case for optional override files
                Err(err @ ConfigError::FileOpen { .. }) => {
                    debug!(source = %descriptor, error = %err, "Skipping unavailable configuration source");
                }
                Err(err) => {
                    warn!(
                        source = %descriptor,
                        error_code = ?err.code(),
                        error = %err,
                        "Skipping configuration source that failed to load"
                    );
                }
            }
        }

        if loaded {
            Ok(())
        } else {
            Err(ConfigError::NoSourceLoaded(descriptors))
        }
    }
}
