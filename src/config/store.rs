//! The flat dotted-key store and its accessors.

use super::document::{self, Node};
use super::flatten::{SEPARATOR, unflatten};
use super::value::FromConfigValue;
use crate::error::{ConfigError, ConfigResult};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

/// Flat configuration map keyed by dotted paths such as `config.server.port`.
///
/// Entries are added or overwritten by the `load_*` methods and read back
/// with [`get`](Self::get) and friends. Nothing is ever removed; [`sub`](Self::sub)
/// copies into a new store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigStore {
    pub(super) items: BTreeMap<String, String>,
}

impl ConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `key` converted to `T`.
    ///
    /// Fails with `KeyNotFound` if the key is absent, or with the type's
    /// coercion error if the stored text does not convert.
    pub fn get<T: FromConfigValue>(&self, key: &str) -> ConfigResult<T> {
        T::from_config_value(key, self.get_raw(key)?)
    }

    /// Read `key` converted to `T`, or `default` if the key is absent.
    ///
    /// Only a missing key falls back; a present but unconvertible value is
    /// still an error.
    pub fn get_or<T: FromConfigValue>(&self, key: &str, default: T) -> ConfigResult<T> {
        match self.get(key) {
            Err(err) if err.is_key_not_found() => Ok(default),
            other => other,
        }
    }

    /// The raw stored text for `key`.
    pub fn get_raw(&self, key: &str) -> ConfigResult<&str> {
        self.items
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))
    }

    /// Insert or overwrite a single entry.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.items.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entries sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Distinct names of the immediate children of `dir`.
    ///
    /// `list("config.server")` over `config.server.host` and
    /// `config.server.port` yields `{"host", "port"}`. Unknown prefixes give
    /// an empty set.
    pub fn list(&self, dir: &str) -> BTreeSet<String> {
        let prefix = format!("{dir}{SEPARATOR}");
        self.items
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .map(|rest| match rest.find(SEPARATOR) {
                Some(end) => rest[..end].to_string(),
                None => rest.to_string(),
            })
            .collect()
    }

    /// Copy the entries under `dir` into a new store, re-rooted at the last
    /// segment of `dir`.
    ///
    /// `sub("config.server")` maps `config.server.port` to `server.port`.
    pub fn sub(&self, dir: &str) -> ConfigStore {
        let prefix = format!("{dir}{SEPARATOR}");
        // Start of the last segment of dir; it stays part of the new keys.
        let keep_from = dir.rfind(SEPARATOR).map_or(0, |pos| pos + 1);

        self.items
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(key, value)| (key[keep_from..].to_string(), value.clone()))
            .collect()
    }

    /// Rebuild the structured tree behind the flat entries.
    pub fn to_tree(&self) -> Node {
        unflatten(&self.items)
    }

    pub fn to_yaml_string(&self) -> ConfigResult<String> {
        document::to_yaml_string(&self.to_tree())
    }

    pub fn to_json_string(&self) -> ConfigResult<String> {
        document::to_json_string(&self.to_tree())
    }

    /// Write every entry as `key = value`, one per line, sorted by key.
    pub fn dump<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "==================== Dump config ====================")?;
        for (key, value) in &self.items {
            writeln!(out, "{} = {}", key, value)?;
        }
        writeln!(out, "=====================================================")?;
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConfigStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            items: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
