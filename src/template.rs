//! Serialization templates such as `{major}.{minor}.{patch}`.
//!
//! Fields are written as `{name}`; literal braces are escaped by doubling
//! them (`{{` and `}}`).

use std::fmt;

use crate::error::{BumpSemverError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(String),
}

/// A parsed serialization template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template string, validating brace usage
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        match c {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => {
                                return Err(BumpSemverError::invalid_template(
                                    source,
                                    "unexpected '{' inside field",
                                ))
                            }
                            other => name.push(other),
                        }
                    }
                    if !closed {
                        return Err(BumpSemverError::invalid_template(
                            source,
                            "unclosed '{'",
                        ));
                    }
                    let name = name.trim();
                    if name.is_empty() {
                        return Err(BumpSemverError::invalid_template(
                            source,
                            "fields must be named",
                        ));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(name.to_string()));
                }
                '}' => {
                    return Err(BumpSemverError::invalid_template(
                        source,
                        "single '}' encountered",
                    ))
                }
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Template {
            source: source.to_string(),
            segments,
        })
    }

    /// The template as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Field names in the order they appear, duplicates included.
    ///
    /// The iterator borrows the template, so it can be restarted by calling
    /// `labels()` again.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Field(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Whether the template references the given field
    pub fn uses(&self, label: &str) -> bool {
        self.labels().any(|l| l == label)
    }

    /// Render the template, looking each field up with `lookup`.
    ///
    /// Fails on the first field `lookup` has no value for.
    pub fn render<'v, F>(&self, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<&'v str>,
    {
        let mut rendered = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Field(name) => match lookup(name) {
                    Some(value) => rendered.push_str(value),
                    None => {
                        return Err(BumpSemverError::MissingValueForSerialization {
                            key: name.clone(),
                            template: self.source.clone(),
                        })
                    }
                },
            }
        }
        Ok(rendered)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}
