use std::collections::BTreeMap;

use chrono::{Local, Utc};

use crate::error::{BumpSemverError, Result};

/// Values available to serialization templates besides the parsed parts.
///
/// Parsed parts always take precedence over context entries with the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    values: BTreeMap<String, String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add every process environment variable as `$NAME`.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn with_environment(mut self) -> Self {
        for (key, value) in std::env::vars_os() {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => {
                    self.values.insert(format!("${}", key), value);
                }
                (key, _) => {
                    tracing::debug!(
                        "Skipping environment variable {:?}: not valid UTF-8",
                        key.unwrap_or_else(|os| os.to_string_lossy().into_owned())
                    );
                }
            }
        }
        self
    }

    /// Add `now` (local) and `utcnow` as RFC 3339 timestamps
    pub fn with_timestamps(mut self) -> Self {
        self.insert("now", Local::now().to_rfc3339());
        self.insert("utcnow", Utc::now().to_rfc3339());
        self
    }

    /// Add an entry given as `key=value`
    pub fn with_assignment(mut self, assignment: &str) -> Result<Self> {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            BumpSemverError::config(format!(
                "Invalid context entry '{}' - expected key=value",
                assignment
            ))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(BumpSemverError::config(format!(
                "Invalid context entry '{}' - empty key",
                assignment
            )));
        }
        self.insert(key, value);
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment() {
        let context = Context::new().with_assignment("build=42").unwrap();
        assert_eq!(context.get("build"), Some("42"));
    }

    #[test]
    fn test_assignment_keeps_equals_in_value() {
        let context = Context::new().with_assignment("expr=a=b").unwrap();
        assert_eq!(context.get("expr"), Some("a=b"));
    }

    #[test]
    fn test_invalid_assignment() {
        assert!(Context::new().with_assignment("build").is_err());
        assert!(Context::new().with_assignment("=1").is_err());
    }

    #[test]
    fn test_timestamps() {
        let context = Context::new().with_timestamps();
        assert!(context.get("now").is_some());
        assert!(context.get("utcnow").is_some());
    }
}
