//! Environment variable helpers shared by the config loaders.

use std::env;
use std::str::FromStr;

use crate::ConfigError;

/// First non-empty value among `names`, in order
pub fn first_var(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

/// Parse a numeric variable, falling back to `default` when unset or blank
pub fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                name: name.to_string(),
                value,
            })
        }
        _ => Ok(default),
    }
}
