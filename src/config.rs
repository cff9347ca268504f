use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::diagnostics::DiagnosticSink;
use crate::error::{BumpSemverError, Result};
use crate::strategy::{BumpStrategy, CalendarStrategy, NumericStrategy, ValuesStrategy};
use crate::version_config::{VersionConfig, DEFAULT_PARSE, DEFAULT_SERIALIZE};

/// File name looked up in the current directory
pub const CONFIG_FILE_NAME: &str = ".bumpsemver.toml";

/// Represents the complete configuration for bumpsemver.
///
/// Contains the current version, how to parse and serialize it, and the
/// bump settings of individual parts.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub current_version: Option<String>,

    #[serde(default = "default_parse")]
    pub parse: String,

    #[serde(default = "default_serialize")]
    pub serialize: Vec<String>,

    #[serde(default)]
    pub parts: HashMap<String, PartConfig>,
}

/// Returns the default parse pattern.
fn default_parse() -> String {
    DEFAULT_PARSE.to_string()
}

/// Returns the default serialization formats.
fn default_serialize() -> Vec<String> {
    vec![DEFAULT_SERIALIZE.to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Config {
            current_version: None,
            parse: default_parse(),
            serialize: default_serialize(),
            parts: HashMap::new(),
        }
    }
}

/// Bump settings for one part.
///
/// A part with `values` steps through that list; a part with `calendar`
/// takes the current date in that strftime format; any other part is numeric.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct PartConfig {
    #[serde(default)]
    pub values: Option<Vec<String>>,

    #[serde(default)]
    pub first_value: Option<String>,

    #[serde(default)]
    pub optional_value: Option<String>,

    #[serde(default)]
    pub calendar: Option<String>,
}

impl PartConfig {
    /// Build the strategy described by this configuration
    pub fn strategy(&self, name: &str) -> Result<Arc<dyn BumpStrategy>> {
        let with_part = |err: BumpSemverError| {
            BumpSemverError::invalid_part_config(name, err.to_string())
        };

        match (&self.values, &self.calendar) {
            (Some(_), Some(_)) => Err(BumpSemverError::invalid_part_config(
                name,
                "'values' and 'calendar' are mutually exclusive",
            )),
            (Some(values), None) => {
                let mut strategy = ValuesStrategy::new(values.clone()).map_err(with_part)?;
                if let Some(first_value) = &self.first_value {
                    strategy = strategy.with_first_value(first_value).map_err(with_part)?;
                }
                if let Some(optional_value) = &self.optional_value {
                    strategy = strategy
                        .with_optional_value(optional_value)
                        .map_err(with_part)?;
                }
                Ok(Arc::new(strategy))
            }
            (None, Some(format)) => {
                if self.first_value.is_some() || self.optional_value.is_some() {
                    return Err(BumpSemverError::invalid_part_config(
                        name,
                        "calendar parts take no 'first_value' or 'optional_value'",
                    ));
                }
                Ok(Arc::new(
                    CalendarStrategy::new(format.clone()).map_err(with_part)?,
                ))
            }
            (None, None) => {
                if self.optional_value.is_some() {
                    return Err(BumpSemverError::invalid_part_config(
                        name,
                        "'optional_value' requires 'values'",
                    ));
                }
                let strategy = match &self.first_value {
                    Some(first_value) => {
                        NumericStrategy::with_first_value(first_value.clone()).map_err(with_part)?
                    }
                    None => NumericStrategy::new(),
                };
                Ok(Arc::new(strategy))
            }
        }
    }
}

impl Config {
    /// Build the versioning scheme described by this configuration
    pub fn version_config(&self, sink: Arc<dyn DiagnosticSink>) -> Result<VersionConfig> {
        let mut version_config =
            VersionConfig::new(&self.parse, self.serialize.as_slice())?.with_sink(sink);

        for (name, part) in &self.parts {
            version_config = version_config.with_part(name.clone(), part.strategy(name)?);
        }

        Ok(version_config)
    }
}

/// Parses configuration from a TOML string.
pub fn parse_config(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `.bumpsemver.toml` in current directory
/// 3. `bumpsemver.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        fs::read_to_string(CONFIG_FILE_NAME)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("bumpsemver.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    tracing::debug!("Loaded configuration ({} bytes)", config_str.len());
    parse_config(&config_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::TracingSink;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.parse, DEFAULT_PARSE);
        assert_eq!(config.serialize, vec![DEFAULT_SERIALIZE.to_string()]);
        assert!(config.parts.is_empty());
        assert!(config.current_version.is_none());
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_parts() {
        let config = parse_config(
            r#"
current_version = "1.0.0-beta"

[parts.release]
values = ["alpha", "beta", "gamma"]
optional_value = "gamma"
"#,
        )
        .unwrap();
        assert_eq!(config.current_version.as_deref(), Some("1.0.0-beta"));
        let release = &config.parts["release"];
        assert_eq!(release.values.as_ref().unwrap().len(), 3);
        assert_eq!(release.optional_value.as_deref(), Some("gamma"));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            parse_config("serialize = 3"),
            Err(BumpSemverError::Toml(_))
        ));
    }

    #[test]
    fn test_part_strategies() {
        let numeric = PartConfig {
            first_value: Some("1".to_string()),
            ..PartConfig::default()
        };
        assert_eq!(numeric.strategy("build").unwrap().first_value(), "1");

        let values = PartConfig {
            values: Some(vec!["dev".to_string(), "prod".to_string()]),
            optional_value: Some("prod".to_string()),
            ..PartConfig::default()
        };
        let strategy = values.strategy("stage").unwrap();
        assert_eq!(strategy.first_value(), "dev");
        assert_eq!(strategy.bump("dev").unwrap(), "prod");
    }

    #[test]
    fn test_part_strategy_errors_name_the_part() {
        let conflicting = PartConfig {
            values: Some(vec!["a".to_string()]),
            calendar: Some("%Y".to_string()),
            ..PartConfig::default()
        };
        let err = conflicting.strategy("release").unwrap_err();
        assert!(err.to_string().contains("'release'"));

        let bad_first = PartConfig {
            first_value: Some("none".to_string()),
            ..PartConfig::default()
        };
        assert!(matches!(
            bad_first.strategy("build"),
            Err(BumpSemverError::InvalidPartConfig { .. })
        ));

        let bad_calendar = PartConfig {
            calendar: Some("%Q".to_string()),
            ..PartConfig::default()
        };
        assert!(matches!(
            bad_calendar.strategy("year"),
            Err(BumpSemverError::InvalidPartConfig { ref part, .. }) if part == "year"
        ));

        let optional_numeric = PartConfig {
            optional_value: Some("0".to_string()),
            ..PartConfig::default()
        };
        assert!(optional_numeric.strategy("patch").is_err());
    }

    #[test]
    fn test_version_config_from_config() {
        let config = parse_config(
            r#"
parse = '(?P<major>\d+)\.(?P<minor>\d+)(\.(?P<build>\d+))?'
serialize = ["{major}.{minor}.{build}", "{major}.{minor}"]

[parts.build]
first_value = "1"
"#,
        )
        .unwrap();
        let version_config = config.version_config(Arc::new(TracingSink)).unwrap();
        let version = version_config.parse("2.4.7").unwrap();
        let bumped = version_config.bump(&version, "minor").unwrap();
        assert_eq!(bumped.get("build").unwrap().value(), "1");
    }
}
