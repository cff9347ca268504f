use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::strategy::{BumpStrategy, NumericStrategy};

/// One named component of a version, e.g. the `2` in `1.2.3`.
///
/// Parts are immutable: `bump` and `null` return new parts sharing the
/// same strategy.
#[derive(Debug, Clone)]
pub struct VersionPart {
    value: String,
    strategy: Arc<dyn BumpStrategy>,
}

impl VersionPart {
    pub fn new(value: impl Into<String>, strategy: Arc<dyn BumpStrategy>) -> Self {
        VersionPart {
            value: value.into(),
            strategy,
        }
    }

    /// Create a part advanced by [`NumericStrategy`]
    pub fn numeric(value: impl Into<String>) -> Self {
        Self::new(value, Arc::new(NumericStrategy::new()))
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn strategy(&self) -> &Arc<dyn BumpStrategy> {
        &self.strategy
    }

    /// Next part according to the strategy
    pub fn bump(&self) -> Result<Self> {
        Ok(VersionPart {
            value: self.strategy.bump(&self.value)?,
            strategy: Arc::clone(&self.strategy),
        })
    }

    /// Part reset to the strategy's first value
    pub fn null(&self) -> Self {
        VersionPart {
            value: self.strategy.first_value(),
            strategy: Arc::clone(&self.strategy),
        }
    }

    /// Whether the part holds its strategy's optional value
    pub fn is_optional(&self) -> bool {
        self.value == self.strategy.optional_value()
    }
}

impl PartialEq for VersionPart {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for VersionPart {}

impl fmt::Display for VersionPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::ValuesStrategy;

    #[test]
    fn test_bump_returns_new_part() {
        let part = VersionPart::numeric("4");
        let bumped = part.bump().unwrap();
        assert_eq!(part.value(), "4");
        assert_eq!(bumped.value(), "5");
    }

    #[test]
    fn test_null_resets_to_first_value() {
        let part = VersionPart::numeric("12");
        assert_eq!(part.null().value(), "0");
    }

    #[test]
    fn test_equality_ignores_strategy() {
        let values = ValuesStrategy::new(vec!["1".to_string(), "2".to_string()]).unwrap();
        let configured = VersionPart::new("1", Arc::new(values));
        assert_eq!(configured, VersionPart::numeric("1"));
        assert_ne!(configured, VersionPart::numeric("2"));
    }

    #[test]
    fn test_is_optional() {
        assert!(VersionPart::numeric("0").is_optional());
        assert!(!VersionPart::numeric("3").is_optional());
    }

    #[test]
    fn test_bump_propagates_strategy_error() {
        let part = VersionPart::numeric("final");
        assert!(part.bump().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(VersionPart::numeric("7").to_string(), "7");
    }
}
