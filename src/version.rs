use std::collections::BTreeMap;

use crate::error::{BumpSemverError, Result};
use crate::part::VersionPart;

/// A version split into named parts.
///
/// Holds only the parts that were actually parsed; optional groups that did
/// not participate in the match are absent.
#[derive(Debug, Clone)]
pub struct Version {
    parts: BTreeMap<String, VersionPart>,
    original: Option<String>,
}

impl Version {
    pub fn new(parts: BTreeMap<String, VersionPart>, original: Option<String>) -> Self {
        Version { parts, original }
    }

    /// The string this version was parsed from, if any
    pub fn original(&self) -> Option<&str> {
        self.original.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&VersionPart> {
        self.parts.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    pub fn parts(&self) -> impl Iterator<Item = (&str, &VersionPart)> {
        self.parts.iter().map(|(name, part)| (name.as_str(), part))
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Bump `part_name` and reset every less significant part.
    ///
    /// `order` lists part names from most to least significant. Parts before
    /// `part_name` are copied, `part_name` is bumped, and parts after it are
    /// reset to their first value. Names in `order` this version does not
    /// hold are skipped, so bumping a part that was not parsed leaves the
    /// version unchanged.
    ///
    /// Returns [`BumpSemverError::UnknownPart`] if `part_name` is not in `order`.
    pub fn bump<S: AsRef<str>>(&self, part_name: &str, order: &[S]) -> Result<Self> {
        if !order.iter().any(|label| label.as_ref() == part_name) {
            return Err(BumpSemverError::UnknownPart {
                part: part_name.to_string(),
                order: order.iter().map(|l| l.as_ref().to_string()).collect(),
            });
        }

        let mut parts = BTreeMap::new();
        let mut bumped = false;
        for label in order.iter().map(|label| label.as_ref()) {
            let Some(part) = self.parts.get(label) else {
                continue;
            };
            let next = if label == part_name {
                bumped = true;
                part.bump()?
            } else if bumped {
                part.null()
            } else {
                part.clone()
            };
            parts.insert(label.to_string(), next);
        }

        // Parts outside the order have no significance and are carried over
        for (name, part) in &self.parts {
            parts.entry(name.clone()).or_insert_with(|| part.clone());
        }

        Ok(Version {
            parts,
            original: None,
        })
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.parts == other.parts
    }
}

impl Eq for Version {}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDER: [&str; 3] = ["major", "minor", "patch"];

    fn version(major: &str, minor: &str, patch: &str) -> Version {
        let parts = BTreeMap::from([
            ("major".to_string(), VersionPart::numeric(major)),
            ("minor".to_string(), VersionPart::numeric(minor)),
            ("patch".to_string(), VersionPart::numeric(patch)),
        ]);
        Version::new(parts, Some(format!("{}.{}.{}", major, minor, patch)))
    }

    #[test]
    fn test_bump_minor_resets_patch() {
        let bumped = version("1", "2", "3").bump("minor", &ORDER).unwrap();
        assert_eq!(bumped, version("1", "3", "0"));
    }

    #[test]
    fn test_bump_major_resets_rest() {
        let bumped = version("1", "2", "3").bump("major", &ORDER).unwrap();
        assert_eq!(bumped, version("2", "0", "0"));
    }

    #[test]
    fn test_bump_patch() {
        let bumped = version("1", "2", "3").bump("patch", &ORDER).unwrap();
        assert_eq!(bumped, version("1", "2", "4"));
    }

    #[test]
    fn test_bump_does_not_mutate() {
        let original = version("1", "2", "3");
        let _ = original.bump("major", &ORDER).unwrap();
        assert_eq!(original, version("1", "2", "3"));
        assert_eq!(original.original(), Some("1.2.3"));
    }

    #[test]
    fn test_bumped_version_has_no_original() {
        let bumped = version("1", "2", "3").bump("patch", &ORDER).unwrap();
        assert_eq!(bumped.original(), None);
    }

    #[test]
    fn test_bump_unknown_part_is_error() {
        let err = version("1", "2", "3").bump("build", &ORDER).unwrap_err();
        assert!(matches!(err, BumpSemverError::UnknownPart { ref part, .. } if part == "build"));
    }

    #[test]
    fn test_bump_absent_optional_part_is_noop() {
        let order = ["major", "minor", "patch", "release"];
        let v = version("1", "2", "3");
        let bumped = v.bump("release", &order).unwrap();
        assert_eq!(bumped, v);
        assert!(!bumped.contains("release"));
    }

    #[test]
    fn test_bump_skips_absent_parts_when_resetting() {
        let parts = BTreeMap::from([
            ("major".to_string(), VersionPart::numeric("1")),
            ("patch".to_string(), VersionPart::numeric("5")),
        ]);
        let bumped = Version::new(parts, None).bump("major", &ORDER).unwrap();
        assert_eq!(bumped.get("major").unwrap().value(), "2");
        assert_eq!(bumped.get("patch").unwrap().value(), "0");
        assert!(!bumped.contains("minor"));
    }

    #[test]
    fn test_bump_keeps_parts_outside_order() {
        let mut parts = BTreeMap::from([("major".to_string(), VersionPart::numeric("1"))]);
        parts.insert("build".to_string(), VersionPart::numeric("77"));
        let bumped = Version::new(parts, None).bump("major", &ORDER).unwrap();
        assert_eq!(bumped.get("build").unwrap().value(), "77");
    }
}
