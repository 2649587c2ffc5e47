//! `get` and `list` subcommands.

use crate::config::{ConfigStore, FromConfigValue};
use crate::error::ConfigResult;
use clap::{Args, ValueEnum};

/// Type a value is read as before printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ValueType {
    /// Raw text
    #[default]
    String,
    /// true/false, case-insensitive
    Bool,
    /// Integer with optional k/m/g/t suffix
    Int,
}

/// Arguments for the get subcommand
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Dotted key, e.g. config.server.port
    pub key: String,

    /// Read the value as this type
    #[arg(long = "as", value_enum, default_value_t = ValueType::String)]
    pub value_type: ValueType,

    /// Printed as-is when the key is missing
    #[arg(long, value_name = "VALUE")]
    pub default: Option<String>,
}

/// Arguments for the list subcommand
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Key prefix whose children are listed
    pub dir: String,
}

/// Resolve a `get` invocation to the text that is printed.
pub fn get_value(store: &ConfigStore, args: &GetArgs) -> ConfigResult<String> {
    let default = args.default.as_deref();
    match args.value_type {
        ValueType::String => lookup::<String>(store, &args.key, default),
        ValueType::Bool => lookup::<bool>(store, &args.key, default),
        ValueType::Int => lookup::<i64>(store, &args.key, default),
    }
}

fn lookup<T>(store: &ConfigStore, key: &str, default: Option<&str>) -> ConfigResult<String>
where
    T: FromConfigValue + ToString,
{
    match (store.get::<T>(key), default) {
        (Err(err), Some(default)) if err.is_key_not_found() => Ok(default.to_string()),
        (result, _) => result.map(|value| value.to_string()),
    }
}

/// Children of `args.dir`, one per line.
pub fn list_children(store: &ConfigStore, args: &ListArgs) -> Vec<String> {
    store.list(&args.dir).into_iter().collect()
}
