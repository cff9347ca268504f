//! Parsing and serialization of version strings
//!
//! A [`VersionConfig`] couples a parse pattern with one or more serialization
//! templates and the bump strategy of each part.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use regex::{Regex, RegexBuilder};

use crate::context::Context;
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::error::{BumpSemverError, Result};
use crate::part::VersionPart;
use crate::strategy::{BumpStrategy, NumericStrategy};
use crate::template::Template;
use crate::version::Version;

/// Three dot-separated numbers named major, minor and patch
pub const DEFAULT_PARSE: &str = r"(?P<major>\d+)\.(?P<minor>\d+)\.(?P<patch>\d+)";

pub const DEFAULT_SERIALIZE: &str = "{major}.{minor}.{patch}";

/// A versioning scheme: how to read a version string and how to write it back
#[derive(Debug, Clone)]
pub struct VersionConfig {
    parse_regex: Regex,
    serialize_formats: Vec<Template>,
    strategies: HashMap<String, Arc<dyn BumpStrategy>>,
    default_strategy: Arc<dyn BumpStrategy>,
    sink: Arc<dyn DiagnosticSink>,
}

impl VersionConfig {
    /// Create a scheme from a parse pattern and serialization templates.
    ///
    /// The pattern is compiled in verbose mode, so whitespace and `#`
    /// comments inside it are ignored. Templates are listed from most to
    /// least specific; the first one defines the order of significance.
    pub fn new<S: AsRef<str>>(parse: &str, serialize: &[S]) -> Result<Self> {
        let parse_regex = RegexBuilder::new(parse).ignore_whitespace(true).build()?;

        let serialize_formats = serialize
            .iter()
            .map(|s| Template::parse(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        if serialize_formats.is_empty() {
            return Err(BumpSemverError::config(
                "At least one serialization format is required",
            ));
        }

        Ok(VersionConfig {
            parse_regex,
            serialize_formats,
            strategies: HashMap::new(),
            default_strategy: Arc::new(NumericStrategy::new()),
            sink: Arc::new(TracingSink),
        })
    }

    /// The `major.minor.patch` scheme
    pub fn semver() -> Result<Self> {
        Self::new(DEFAULT_PARSE, &[DEFAULT_SERIALIZE])
    }

    /// Use `strategy` for parts named `name`
    pub fn with_part(mut self, name: impl Into<String>, strategy: Arc<dyn BumpStrategy>) -> Self {
        self.strategies.insert(name.into(), strategy);
        self
    }

    /// Strategy for parts without a dedicated one
    pub fn with_default_strategy(mut self, strategy: Arc<dyn BumpStrategy>) -> Self {
        self.default_strategy = strategy;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn parse_pattern(&self) -> &str {
        self.parse_regex.as_str()
    }

    pub fn serialize_formats(&self) -> &[Template] {
        &self.serialize_formats
    }

    /// Names of the capture groups in the parse pattern
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parse_regex.capture_names().flatten()
    }

    fn strategy_for(&self, name: &str) -> Arc<dyn BumpStrategy> {
        self.strategies
            .get(name)
            .map_or_else(|| Arc::clone(&self.default_strategy), Arc::clone)
    }

    /// Parse a version string.
    ///
    /// Returns `None` when the string is empty or the pattern finds no match;
    /// the mismatch is reported to the diagnostic sink. Groups that did not
    /// take part in the match are left out of the version.
    pub fn parse(&self, version_string: &str) -> Option<Version> {
        let captures = if version_string.is_empty() {
            None
        } else {
            self.parse_regex.captures(version_string)
        };

        let Some(captures) = captures else {
            self.sink.emit(Diagnostic::ParseMismatch {
                pattern: self.parse_pattern().to_string(),
                input: version_string.to_string(),
            });
            return None;
        };

        let parts: BTreeMap<String, VersionPart> = self
            .part_names()
            .filter_map(|name| {
                captures.name(name).map(|m| {
                    (
                        name.to_string(),
                        VersionPart::new(m.as_str(), self.strategy_for(name)),
                    )
                })
            })
            .collect();

        self.sink.emit(Diagnostic::Parsed {
            input: version_string.to_string(),
            parts: parts
                .iter()
                .map(|(name, part)| format!("{}={}", name, part))
                .collect(),
        });

        Some(Version::new(parts, Some(version_string.to_string())))
    }

    /// Like [`parse`](Self::parse), but a mismatch is an error
    pub fn parse_required(&self, version_string: &str) -> Result<Version> {
        self.parse(version_string)
            .ok_or_else(|| BumpSemverError::ParseMismatch {
                pattern: self.parse_pattern().to_string(),
                input: version_string.to_string(),
            })
    }

    /// Part names in order of significance, as they appear in the first
    /// serialization format.
    pub fn order(&self) -> impl Iterator<Item = &str> + '_ {
        self.serialize_formats[0].labels()
    }

    /// Bump `part` of `version` following [`order`](Self::order)
    pub fn bump(&self, version: &Version, part: &str) -> Result<Version> {
        let order: Vec<&str> = self.order().collect();
        version.bump(part, &order)
    }

    /// Parsed keys that a strict serialization must contain: every key of the
    /// order whose value is a parsed part. Keys that only come from the
    /// context need no representation.
    pub fn keys_needing_representation(&self, version: &Version) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for key in self.order() {
            if version.contains(key) && !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
        keys
    }

    /// Parsed keys a format must contain to be picked by
    /// [`choose_format`](Self::choose_format) in lenient mode.
    ///
    /// Walking the order, every non-optional part extends the requirement to
    /// all keys up to and including it, so trailing parts holding their
    /// optional value may be left out.
    pub fn significant_keys(&self, version: &Version) -> Vec<String> {
        let order: Vec<&str> = self.order().collect();
        let mut needed: &[&str] = &[];
        for (i, key) in order.iter().enumerate() {
            match version.get(key) {
                Some(part) if !part.is_optional() => needed = &order[..=i],
                _ => {}
            }
        }

        let mut keys: Vec<String> = Vec::with_capacity(needed.len());
        for key in needed {
            if version.contains(key) && !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
        keys
    }

    fn render(&self, version: &Version, template: &Template, context: &Context) -> Result<String> {
        template.render(|key| {
            version
                .get(key)
                .map(VersionPart::value)
                .or_else(|| context.get(key))
        })
    }

    /// Fails if `template` does not use every key in `keys`.
    fn ensure_represented(template: &Template, keys: Vec<String>) -> Result<()> {
        let missing: Vec<String> = keys.into_iter().filter(|key| !template.uses(key)).collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(BumpSemverError::IncompleteVersionRepresentation {
                template: template.as_str().to_string(),
                missing,
            })
        }
    }

    /// Serialize `version` with one specific template.
    ///
    /// Version parts override context values of the same name. With `strict`
    /// set, fails if a key from
    /// [`keys_needing_representation`](Self::keys_needing_representation)
    /// is not used by `template`.
    pub fn serialize_with(
        &self,
        version: &Version,
        template: &Template,
        context: &Context,
        strict: bool,
    ) -> Result<String> {
        let serialized = self.render(version, template, context)?;
        if strict {
            Self::ensure_represented(template, self.keys_needing_representation(version))?;
        }
        Ok(serialized)
    }

    /// Pick the serialization format for `version`.
    ///
    /// The last format that represents every required part wins. Without one,
    /// the first format that renders at all is used. Required parts are
    /// [`keys_needing_representation`](Self::keys_needing_representation)
    /// when `strict` is set, [`significant_keys`](Self::significant_keys)
    /// otherwise.
    pub fn choose_format(
        &self,
        version: &Version,
        context: &Context,
        strict: bool,
    ) -> Result<&Template> {
        let required = if strict {
            self.keys_needing_representation(version)
        } else {
            self.significant_keys(version)
        };

        let mut chosen = None;
        let mut fallback = None;
        let mut first_missing = None;

        for template in &self.serialize_formats {
            let checked = self
                .render(version, template, context)
                .and_then(|_| Self::ensure_represented(template, required.clone()));
            match checked {
                Ok(()) => chosen = Some(template),
                Err(err @ BumpSemverError::IncompleteVersionRepresentation { .. }) => {
                    self.reject(template, &err);
                    fallback = fallback.or(Some(template));
                }
                Err(err @ BumpSemverError::MissingValueForSerialization { .. }) => {
                    self.reject(template, &err);
                    first_missing = first_missing.or(Some(err));
                }
                Err(err) => return Err(err),
            }
        }

        match (chosen.or(fallback), first_missing) {
            (Some(template), _) => Ok(template),
            (None, Some(err)) => Err(err),
            (None, None) => Err(BumpSemverError::config(
                "No serialization format available",
            )),
        }
    }

    fn reject(&self, template: &Template, err: &BumpSemverError) {
        self.sink.emit(Diagnostic::FormatRejected {
            template: template.as_str().to_string(),
            reason: err.to_string(),
        });
    }

    /// Serialize `version` with the format chosen by [`choose_format`](Self::choose_format)
    pub fn serialize(&self, version: &Version, context: &Context) -> Result<String> {
        let template = self.choose_format(version, context, false)?;
        self.sink.emit(Diagnostic::FormatChosen {
            template: template.as_str().to_string(),
        });
        self.serialize_with(version, template, context, false)
    }
}
