//! Source locations attached to operations and ports.
//!
//! Hardware IR carries the location of the construct in the *source*
//! language (file, line, column) rather than a byte span into the IR text,
//! since that is what a debugger needs to point back at.

use std::fmt;

use crate::{Name, StringLookup};

/// A file/line/column location.
///
/// `line` and `column` are 1-based; `0` means "unknown".
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Location {
    pub file: Name,
    pub line: u32,
    pub column: u32,
}

impl Location {
    /// Location for synthesized operations.
    pub const UNKNOWN: Location = Location {
        file: Name::EMPTY,
        line: 0,
        column: 0,
    };

    /// Create a new location.
    #[inline]
    pub const fn new(file: Name, line: u32, column: u32) -> Self {
        Location { file, line, column }
    }

    /// Returns `true` if this is [`Location::UNKNOWN`].
    #[inline]
    pub const fn is_unknown(&self) -> bool {
        self.file.is_empty() && self.line == 0 && self.column == 0
    }

    /// Render as `file:line:col` (or `<unknown>`).
    pub fn display<'a>(&self, lookup: &'a impl StringLookup) -> LocationDisplay<'a> {
        LocationDisplay {
            file: lookup.lookup(self.file),
            line: self.line,
            column: self.column,
        }
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            write!(f, "loc(unknown)")
        } else {
            write!(f, "loc({:?}:{}:{})", self.file, self.line, self.column)
        }
    }
}

/// Resolved location, see [`Location::display`].
pub struct LocationDisplay<'a> {
    file: &'a str,
    line: u32,
    column: u32,
}

impl fmt::Display for LocationDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file.is_empty() && self.line == 0 {
            write!(f, "<unknown>")
        } else {
            write!(f, "{}:{}:{}", self.file, self.line, self.column)
        }
    }
}
