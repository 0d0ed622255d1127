//! Environment-derived logger defaults
//!
//! | Variable                    | Meaning                         | Default        |
//! |-----------------------------|---------------------------------|----------------|
//! | `PINE_LEVEL`                | console level                   | `debug`        |
//! | `PINE_COLORS`               | `true` enables colors           | off            |
//! | `PINE_GRAYLOG_ENABLED`      | enable the GELF handler         | off            |
//! | `PINE_GRAYLOG_ADDR`         | GELF `host:port`                | empty          |
//! | `PINE_GRAYLOG_LEVEL`        | GELF level                      | console level  |
//! | `PINE_GRAYLOG_EXTRA_<NAME>` | extra GELF field `<name>`       |                |
//!
//! Unparseable values fall back to the default.

use super::field::Field;
use super::level::Level;

pub const ENV_LEVEL: &str = "PINE_LEVEL";
pub const ENV_COLORS: &str = "PINE_COLORS";
pub const ENV_GRAYLOG_ENABLED: &str = "PINE_GRAYLOG_ENABLED";
pub const ENV_GRAYLOG_ADDR: &str = "PINE_GRAYLOG_ADDR";
pub const ENV_GRAYLOG_LEVEL: &str = "PINE_GRAYLOG_LEVEL";
pub const ENV_GRAYLOG_EXTRA_PREFIX: &str = "PINE_GRAYLOG_EXTRA_";

#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub level: Level,
    pub use_colors: bool,
    pub gelf_enabled: bool,
    pub gelf_address: String,
    pub gelf_level: Level,
    /// Sorted by key
    pub gelf_extra_fields: Vec<Field>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            level: Level::Debug,
            use_colors: false,
            gelf_enabled: false,
            gelf_address: String::new(),
            gelf_level: Level::Debug,
            gelf_extra_fields: Vec::new(),
        }
    }
}

impl EnvConfig {
    /// Read the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Build from explicit `(name, value)` pairs.
    ///
    /// # Example
    ///
    /// ```
    /// use pine_logger::{EnvConfig, Level};
    ///
    /// let config = EnvConfig::from_vars([
    ///     ("PINE_LEVEL", "warn"),
    ///     ("PINE_GRAYLOG_EXTRA_SERVICE", "billing"),
    /// ]);
    /// assert_eq!(config.level, Level::Warn);
    /// assert_eq!(config.gelf_level, Level::Warn);
    /// assert_eq!(config.gelf_extra_fields[0].key(), "service");
    /// ```
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut level = None;
        let mut use_colors = None;
        let mut gelf_enabled = None;
        let mut gelf_address = None;
        let mut gelf_level = None;
        let mut extras: Vec<(String, String)> = Vec::new();

        for (name, value) in vars {
            let (name, value) = (name.as_ref(), value.as_ref());
            match name {
                ENV_LEVEL => level = parse_level_var(value),
                ENV_COLORS => use_colors = parse_colors_var(value),
                ENV_GRAYLOG_ENABLED => gelf_enabled = parse_bool_var(value),
                ENV_GRAYLOG_ADDR => gelf_address = Some(value.to_string()),
                ENV_GRAYLOG_LEVEL => gelf_level = parse_level_var(value),
                _ => {
                    if let Some(extra) = name.strip_prefix(ENV_GRAYLOG_EXTRA_PREFIX) {
                        if !extra.is_empty() {
                            extras.push((extra.to_lowercase(), value.to_string()));
                        }
                    }
                }
            }
        }

        extras.sort();
        let defaults = Self::default();
        let level = level.unwrap_or(defaults.level);
        Self {
            level,
            use_colors: use_colors.unwrap_or(defaults.use_colors),
            gelf_enabled: gelf_enabled.unwrap_or(defaults.gelf_enabled),
            gelf_address: gelf_address.unwrap_or(defaults.gelf_address),
            gelf_level: gelf_level.unwrap_or(level),
            gelf_extra_fields: extras
                .into_iter()
                .map(|(key, value)| Field::string(key, value))
                .collect(),
        }
    }
}

fn parse_level_var(value: &str) -> Option<Level> {
    if value.is_empty() {
        return None;
    }
    value.parse().ok()
}

/// Anything set other than `true` turns colors off.
fn parse_colors_var(value: &str) -> Option<bool> {
    if value.is_empty() {
        return None;
    }
    Some(value.eq_ignore_ascii_case("true"))
}

fn parse_bool_var(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(vars: &[(&str, &str)]) -> EnvConfig {
        EnvConfig::from_vars(vars.iter().copied())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.level, Level::Debug);
        assert!(!config.use_colors);
        assert!(!config.gelf_enabled);
        assert!(config.gelf_address.is_empty());
        assert_eq!(config.gelf_level, Level::Debug);
        assert!(config.gelf_extra_fields.is_empty());
    }

    #[test]
    fn test_levels() {
        let config = config(&[("PINE_LEVEL", "INFO"), ("PINE_GRAYLOG_LEVEL", "error")]);
        assert_eq!(config.level, Level::Info);
        assert_eq!(config.gelf_level, Level::Error);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config(&[
            ("PINE_LEVEL", "loud"),
            ("PINE_GRAYLOG_ENABLED", "yes"),
            ("PINE_GRAYLOG_LEVEL", "quiet"),
        ]);
        assert_eq!(config.level, Level::Debug);
        assert!(!config.gelf_enabled);
        assert_eq!(config.gelf_level, Level::Debug);
    }

    #[test]
    fn test_colors() {
        assert!(config(&[("PINE_COLORS", "TRUE")]).use_colors);
        assert!(!config(&[("PINE_COLORS", "1")]).use_colors);
    }

    #[test]
    fn test_graylog_settings() {
        let config = config(&[
            ("PINE_GRAYLOG_ENABLED", "1"),
            ("PINE_GRAYLOG_ADDR", "graylog:12201"),
            ("PINE_GRAYLOG_EXTRA_ZONE", "eu"),
            ("PINE_GRAYLOG_EXTRA_App", "pine"),
            ("PINE_GRAYLOG_EXTRA_", "ignored"),
            ("HOME", "/root"),
        ]);
        assert!(config.gelf_enabled);
        assert_eq!(config.gelf_address, "graylog:12201");
        let keys: Vec<&str> = config.gelf_extra_fields.iter().map(Field::key).collect();
        assert_eq!(keys, ["app", "zone"]);
    }
}
