//! `dump` and `sub` subcommands.

use crate::config::ConfigStore;
use anyhow::Result;
use clap::{Args, ValueEnum};
use std::io::Write;

/// Output format for printed stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DumpFormat {
    /// `key = value` lines
    #[default]
    Flat,
    /// Nested YAML document
    Yaml,
    /// Nested JSON document
    Json,
}

/// Arguments for the dump subcommand
#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = DumpFormat::Flat)]
    pub format: DumpFormat,
}

/// Arguments for the sub subcommand
#[derive(Args, Debug)]
pub struct SubArgs {
    /// Key prefix to extract
    pub dir: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = DumpFormat::Flat)]
    pub format: DumpFormat,
}

/// Write `store` to `out` in `format`.
pub fn write_store<W: Write>(store: &ConfigStore, format: DumpFormat, mut out: W) -> Result<()> {
    match format {
        DumpFormat::Flat => store.dump(out)?,
        DumpFormat::Yaml => out.write_all(store.to_yaml_string()?.as_bytes())?,
        DumpFormat::Json => writeln!(out, "{}", store.to_json_string()?)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(store: &ConfigStore, format: DumpFormat) -> String {
        let mut out = Vec::new();
        write_store(store, format, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_flat_output() {
        let store = ConfigStore::from_iter([("a.b", "1")]);
        assert!(render(&store, DumpFormat::Flat).contains("a.b = 1\n"));
    }

    #[test]
    fn test_yaml_output_reloads_to_same_store() {
        let store = ConfigStore::from_iter([
            ("server.host", "localhost"),
            ("server.port", "5678"),
            ("server.hosts", "[a, b]"),
            ("debug", "false"),
        ]);
        let mut reloaded = ConfigStore::new();
        reloaded.load_str(&render(&store, DumpFormat::Yaml)).unwrap();
        assert_eq!(reloaded, store);
    }

    #[test]
    fn test_json_output_of_sub_store() {
        let store = ConfigStore::from_iter([("config.server.port", "5678"), ("config.name", "x")]);
        let text = render(&store.sub("config.server"), DumpFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, serde_json::json!({"server": {"port": 5678}}));
    }
}
