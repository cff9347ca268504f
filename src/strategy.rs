//! Bump strategies for individual version parts
//!
//! A strategy knows the value a part resets to and how to advance a value:
//! - [`NumericStrategy`] increments the first number found in the value
//! - [`ValuesStrategy`] steps through a fixed list of values
//! - [`CalendarStrategy`] replaces the value with the current date

use std::fmt::{self, Write as _};

use chrono::format::{Item, StrftimeItems};
use chrono::{Local, NaiveDate};

use crate::error::{BumpSemverError, Result};

/// Trait for part bump strategies
pub trait BumpStrategy: Send + Sync + fmt::Debug {
    /// Value a part is reset to when a more significant part is bumped
    fn first_value(&self) -> String;

    /// Value for which the part may be left out of the serialized version
    fn optional_value(&self) -> String {
        self.first_value()
    }

    /// Compute the value following `current`
    fn bump(&self, current: &str) -> Result<String>;
}

/// Splits a value around its first run of ASCII digits.
fn split_first_number(value: &str) -> Option<(&str, &str, &str)> {
    let start = value.find(|c: char| c.is_ascii_digit())?;
    let end = value[start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(value.len(), |offset| start + offset);
    Some((&value[..start], &value[start..end], &value[end..]))
}

/// Increments the first number in a value, keeping prefix, suffix and zero padding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericStrategy {
    first_value: String,
}

impl NumericStrategy {
    pub fn new() -> Self {
        NumericStrategy {
            first_value: "0".to_string(),
        }
    }

    /// Create a strategy resetting to `first_value`, which must contain a number
    pub fn with_first_value(first_value: impl Into<String>) -> Result<Self> {
        let first_value = first_value.into();
        if split_first_number(&first_value).is_none() {
            return Err(BumpSemverError::invalid_value(
                first_value,
                "first value does not contain any digit",
            ));
        }
        Ok(NumericStrategy { first_value })
    }
}

impl Default for NumericStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl BumpStrategy for NumericStrategy {
    fn first_value(&self) -> String {
        self.first_value.clone()
    }

    fn bump(&self, current: &str) -> Result<String> {
        let (prefix, digits, suffix) = split_first_number(current)
            .ok_or_else(|| BumpSemverError::invalid_value(current, "no number to increment"))?;

        Ok(format!("{}{}{}", prefix, increment_digits(digits), suffix))
    }
}

/// Adds one to a run of ASCII digits of any length, keeping its width
/// unless every digit carries (`"099"` -> `"100"`, `"99"` -> `"100"`).
fn increment_digits(digits: &str) -> String {
    let mut bytes = digits.as_bytes().to_vec();
    for byte in bytes.iter_mut().rev() {
        if *byte == b'9' {
            *byte = b'0';
        } else {
            *byte += 1;
            return String::from_utf8_lossy(&bytes).into_owned();
        }
    }
    format!("1{}", String::from_utf8_lossy(&bytes))
}

/// Steps through an ordered list of allowed values (e.g. `alpha`, `beta`, `gamma`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuesStrategy {
    values: Vec<String>,
    first_value: String,
    optional_value: String,
}

impl ValuesStrategy {
    /// Create a strategy over `values`, resetting to the first entry
    pub fn new(values: Vec<String>) -> Result<Self> {
        let first_value = values
            .first()
            .cloned()
            .ok_or_else(|| BumpSemverError::config("values list must not be empty"))?;
        Ok(ValuesStrategy {
            optional_value: first_value.clone(),
            first_value,
            values,
        })
    }

    /// Override the value parts reset to; it must be one of the values
    pub fn with_first_value(mut self, first_value: impl Into<String>) -> Result<Self> {
        let first_value = first_value.into();
        self.ensure_known(&first_value)?;
        if self.optional_value == self.first_value {
            self.optional_value = first_value.clone();
        }
        self.first_value = first_value;
        Ok(self)
    }

    /// Override the value that may be omitted when serializing
    pub fn with_optional_value(mut self, optional_value: impl Into<String>) -> Result<Self> {
        let optional_value = optional_value.into();
        self.ensure_known(&optional_value)?;
        self.optional_value = optional_value;
        Ok(self)
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    fn ensure_known(&self, value: &str) -> Result<()> {
        if self.values.iter().any(|v| v == value) {
            Ok(())
        } else {
            Err(BumpSemverError::invalid_value(
                value,
                format!("not one of {:?}", self.values),
            ))
        }
    }
}

impl BumpStrategy for ValuesStrategy {
    fn first_value(&self) -> String {
        self.first_value.clone()
    }

    fn optional_value(&self) -> String {
        self.optional_value.clone()
    }

    fn bump(&self, current: &str) -> Result<String> {
        let position = self
            .values
            .iter()
            .position(|v| v == current)
            .ok_or_else(|| {
                BumpSemverError::invalid_value(current, format!("not one of {:?}", self.values))
            })?;

        self.values
            .get(position + 1)
            .cloned()
            .ok_or_else(|| BumpSemverError::ValuesExhausted {
                values: self.values.clone(),
            })
    }
}

/// Replaces the value with today's date rendered through a strftime format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarStrategy {
    format: String,
    today: Option<NaiveDate>,
}

impl CalendarStrategy {
    /// Create a strategy using the local date, e.g. `CalendarStrategy::new("%Y")`.
    ///
    /// Fails if `format` contains an unknown strftime specifier or one a
    /// date cannot render, such as `%H`.
    pub fn new(format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            return Err(BumpSemverError::invalid_value(
                format,
                "not a valid strftime format",
            ));
        }
        let mut sample = String::new();
        if write!(sample, "{}", NaiveDate::default().format(&format)).is_err() {
            return Err(BumpSemverError::invalid_value(
                format,
                "format needs more than a date",
            ));
        }
        Ok(CalendarStrategy {
            format,
            today: None,
        })
    }

    /// Pin the date used instead of the local clock
    pub fn with_date(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn render_today(&self) -> String {
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        today.format(&self.format).to_string()
    }
}

impl BumpStrategy for CalendarStrategy {
    fn first_value(&self) -> String {
        self.render_today()
    }

    fn bump(&self, _current: &str) -> Result<String> {
        Ok(self.render_today())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_defaults() {
        let strategy = NumericStrategy::new();
        assert_eq!(strategy.first_value(), "0");
        assert_eq!(strategy.optional_value(), "0");
        assert_eq!(strategy.bump("0").unwrap(), "1");
        assert_eq!(strategy.bump("9").unwrap(), "10");
    }

    #[test]
    fn test_numeric_keeps_prefix_and_suffix() {
        let strategy = NumericStrategy::new();
        assert_eq!(strategy.bump("r9-final").unwrap(), "r10-final");
        assert_eq!(strategy.bump("dev3").unwrap(), "dev4");
    }

    #[test]
    fn test_numeric_keeps_zero_padding() {
        let strategy = NumericStrategy::new();
        assert_eq!(strategy.bump("007").unwrap(), "008");
        assert_eq!(strategy.bump("09").unwrap(), "10");
        assert_eq!(strategy.bump("99").unwrap(), "100");
    }

    #[test]
    fn test_numeric_only_first_number() {
        let strategy = NumericStrategy::new();
        assert_eq!(strategy.bump("1a1").unwrap(), "2a1");
    }

    #[test]
    fn test_numeric_rejects_non_numeric() {
        let strategy = NumericStrategy::new();
        assert!(strategy.bump("alpha").is_err());
        assert!(strategy.bump("").is_err());
    }

    #[test]
    fn test_numeric_beyond_u64() {
        let strategy = NumericStrategy::new();
        assert_eq!(
            strategy.bump("18446744073709551615").unwrap(),
            "18446744073709551616"
        );
        assert_eq!(
            strategy.bump("99999999999999999999").unwrap(),
            "100000000000000000000"
        );
        assert_eq!(strategy.bump("v0099-rc").unwrap(), "v0100-rc");
    }

    #[test]
    fn test_numeric_first_value_must_have_digit() {
        assert!(NumericStrategy::with_first_value("1").is_ok());
        assert!(NumericStrategy::with_first_value("b0").is_ok());
        assert!(NumericStrategy::with_first_value("none").is_err());
    }

    #[test]
    fn test_values_bump() {
        let strategy = ValuesStrategy::new(vec![
            "alpha".to_string(),
            "beta".to_string(),
            "gamma".to_string(),
        ])
        .unwrap();
        assert_eq!(strategy.first_value(), "alpha");
        assert_eq!(strategy.bump("alpha").unwrap(), "beta");
        assert_eq!(strategy.bump("beta").unwrap(), "gamma");
        assert!(matches!(
            strategy.bump("gamma"),
            Err(BumpSemverError::ValuesExhausted { .. })
        ));
        assert!(matches!(
            strategy.bump("delta"),
            Err(BumpSemverError::InvalidPartValue { .. })
        ));
    }

    #[test]
    fn test_values_optional_value() {
        let strategy = ValuesStrategy::new(vec!["dev".to_string(), "prod".to_string()])
            .unwrap()
            .with_optional_value("prod")
            .unwrap();
        assert_eq!(strategy.first_value(), "dev");
        assert_eq!(strategy.optional_value(), "prod");
    }

    #[test]
    fn test_values_first_value_moves_default_optional() {
        let strategy = ValuesStrategy::new(vec!["a".to_string(), "b".to_string()])
            .unwrap()
            .with_first_value("b")
            .unwrap();
        assert_eq!(strategy.first_value(), "b");
        assert_eq!(strategy.optional_value(), "b");
    }

    #[test]
    fn test_values_rejects_unknown_settings() {
        assert!(ValuesStrategy::new(vec![]).is_err());
        let strategy = ValuesStrategy::new(vec!["a".to_string()]).unwrap();
        assert!(strategy.clone().with_first_value("z").is_err());
        assert!(strategy.with_optional_value("z").is_err());
    }

    #[test]
    fn test_calendar_strategy() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let strategy = CalendarStrategy::new("%Y.%m").unwrap().with_date(date);
        assert_eq!(strategy.first_value(), "2024.03");
        assert_eq!(strategy.bump("2023.11").unwrap(), "2024.03");
    }

    #[test]
    fn test_calendar_rejects_unknown_specifier() {
        assert!(matches!(
            CalendarStrategy::new("%Q"),
            Err(BumpSemverError::InvalidPartValue { .. })
        ));
        assert!(CalendarStrategy::new("%Y.%H").is_err());
        assert!(CalendarStrategy::new("%Y.%-m").is_ok());
    }
}
