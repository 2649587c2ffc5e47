//! Typed coercion of stored string values.

use crate::error::{ConfigError, ConfigResult};

/// Types that can be read out of a [`ConfigStore`](super::ConfigStore).
///
/// Only strings, booleans and magnitude-suffixed integers are supported.
pub trait FromConfigValue: Sized {
    /// Convert the raw value stored under `key`.
    fn from_config_value(key: &str, value: &str) -> ConfigResult<Self>;
}

impl FromConfigValue for String {
    fn from_config_value(_key: &str, value: &str) -> ConfigResult<Self> {
        Ok(value.to_string())
    }
}

impl FromConfigValue for bool {
    fn from_config_value(key: &str, value: &str) -> ConfigResult<Self> {
        if value.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if value.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(ConfigError::invalid_bool(key, value))
        }
    }
}

impl FromConfigValue for i64 {
    fn from_config_value(key: &str, value: &str) -> ConfigResult<Self> {
        parse_magnitude(value).ok_or_else(|| ConfigError::invalid_integer(key, value))
    }
}

/// Parse a base-10 integer with an optional binary magnitude suffix.
///
/// Supports: k, m, g, t (case-insensitive) as powers of 1024. Returns
/// `None` for malformed text and for results that overflow `i64`.
pub fn parse_magnitude(value: &str) -> Option<i64> {
    let (digits, unit) = match value.as_bytes().last()?.to_ascii_lowercase() {
        b'k' => (&value[..value.len() - 1], 1i64 << 10),
        b'm' => (&value[..value.len() - 1], 1i64 << 20),
        b'g' => (&value[..value.len() - 1], 1i64 << 30),
        b't' => (&value[..value.len() - 1], 1i64 << 40),
        _ => (value, 1),
    };
    digits.parse::<i64>().ok()?.checked_mul(unit)
}
