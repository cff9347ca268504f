//! Diagnostic events raised while parsing and serializing versions.
//!
//! A [`DiagnosticSink`] is handed to [`VersionConfig`](crate::VersionConfig)
//! at construction. [`TracingSink`] forwards events to `tracing`;
//! [`RecordingSink`] keeps them in memory.

use std::fmt;
use std::sync::Mutex;

/// Events that are not errors but are worth reporting
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// The parse pattern did not match the input
    ParseMismatch { pattern: String, input: String },
    /// The input was parsed into the listed parts
    Parsed { input: String, parts: Vec<String> },
    /// A serialization format was skipped while choosing one
    FormatRejected { template: String, reason: String },
    /// The serialization format used for a version
    FormatChosen { template: String },
}

impl Diagnostic {
    /// Whether the event should be surfaced as a warning
    pub fn is_warning(&self) -> bool {
        matches!(self, Diagnostic::ParseMismatch { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ParseMismatch { pattern, input } => {
                write!(f, "'{}' does not parse current version '{}'", pattern, input)
            }
            Diagnostic::Parsed { input, parts } => {
                write!(f, "Parsed '{}' into parts: {}", input, parts.join(", "))
            }
            Diagnostic::FormatRejected { template, reason } => {
                write!(f, "Format '{}' rejected: {}", template, reason)
            }
            Diagnostic::FormatChosen { template } => {
                write!(f, "Using serialization format '{}'", template)
            }
        }
    }
}

/// Receiver for diagnostics
pub trait DiagnosticSink: Send + Sync + fmt::Debug {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::ParseMismatch { pattern, input } => {
                tracing::warn!(%pattern, %input, "{}", diagnostic);
            }
            Diagnostic::Parsed { .. } => tracing::debug!("{}", diagnostic),
            Diagnostic::FormatRejected { .. } => tracing::debug!("{}", diagnostic),
            Diagnostic::FormatChosen { template } => {
                tracing::info!(%template, "{}", diagnostic);
            }
        }
    }
}

/// Keeps every diagnostic it receives
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far
    pub fn events(&self) -> Vec<Diagnostic> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn warnings(&self) -> Vec<Diagnostic> {
        self.events().into_iter().filter(Diagnostic::is_warning).collect()
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        match self.events.lock() {
            Ok(mut events) => events.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}
