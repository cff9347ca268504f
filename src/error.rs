use thiserror::Error;

/// Unified error type for bumpsemver operations
#[derive(Error, Debug)]
pub enum BumpSemverError {
    #[error("Invalid parse pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Invalid serialization template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("Invalid configuration for part '{part}': {reason}")]
    InvalidPartConfig { part: String, reason: String },

    #[error("Invalid value '{value}': {reason}")]
    InvalidPartValue { value: String, reason: String },

    #[error("The part has already the maximum value among {values:?} and cannot be bumped")]
    ValuesExhausted { values: Vec<String> },

    #[error("Unknown part '{part}', expected one of {order:?}")]
    UnknownPart { part: String, order: Vec<String> },

    #[error("Did not find key '{key}' in version to serialize with '{template}'")]
    MissingValueForSerialization { key: String, template: String },

    #[error("Could not represent '{}' in format '{template}'", .missing.join("', '"))]
    IncompleteVersionRepresentation {
        template: String,
        missing: Vec<String>,
    },

    #[error("'{pattern}' does not parse version '{input}'")]
    ParseMismatch { pattern: String, input: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in bumpsemver
pub type Result<T> = std::result::Result<T, BumpSemverError>;

impl BumpSemverError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BumpSemverError::Config(msg.into())
    }

    /// Create an invalid part value error
    pub fn invalid_value(value: impl Into<String>, reason: impl Into<String>) -> Self {
        BumpSemverError::InvalidPartValue {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid part configuration error
    pub fn invalid_part_config(part: impl Into<String>, reason: impl Into<String>) -> Self {
        BumpSemverError::InvalidPartConfig {
            part: part.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid template error
    pub fn invalid_template(template: impl Into<String>, reason: impl Into<String>) -> Self {
        BumpSemverError::InvalidTemplate {
            template: template.into(),
            reason: reason.into(),
        }
    }
}
