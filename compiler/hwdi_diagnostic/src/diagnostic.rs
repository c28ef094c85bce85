//! Structured diagnostics.

use std::fmt::{self, Write as _};

use hwdi_ir::{Location, StringLookup};

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A message attached to a source location.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub loc: Location,
    pub message: String,
    /// The primary label marks where the problem is; secondary labels mark
    /// related places.
    pub primary: bool,
}

/// A diagnostic describing why extraction failed.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Start an error diagnostic.
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            severity: Severity::Error,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    #[must_use]
    pub fn with_label(mut self, loc: Location, message: impl Into<String>) -> Self {
        self.labels.push(Label {
            loc,
            message: message.into(),
            primary: true,
        });
        self
    }

    #[must_use]
    pub fn with_secondary_label(mut self, loc: Location, message: impl Into<String>) -> Self {
        self.labels.push(Label {
            loc,
            message: message.into(),
            primary: false,
        });
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// The first primary label, if any.
    pub fn primary_label(&self) -> Option<&Label> {
        self.labels.iter().find(|label| label.primary)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Render as plain text, resolving file names through `lookup`.
    ///
    /// ```text
    /// error[E2001]: unresolved debug scope reference
    ///   --> top.sv:4:3: variable `count` names this scope
    ///   ::: top.sv:2:1: in module `Top`
    ///   = note: scopes must be defined by a `dbg.scope` in the same module
    /// ```
    pub fn render(&self, lookup: &impl StringLookup) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{}[{}]: {}", self.severity, self.code, self.message);
        for label in &self.labels {
            let marker = if label.primary { "-->" } else { ":::" };
            let _ = writeln!(
                out,
                "  {marker} {}: {}",
                label.loc.display(lookup),
                label.message
            );
        }
        for note in &self.notes {
            let _ = writeln!(out, "  = note: {note}");
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
    }
}

#[cfg(test)]
mod tests;
