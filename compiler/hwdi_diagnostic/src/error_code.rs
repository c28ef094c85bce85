//! Error codes for debug-info extraction failures.
//!
//! Format: E#### where the first digit is the category:
//! - E1xxx: module structure (definitions, ports)
//! - E2xxx: debug annotations (scopes, enums, module info)

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Module structure (E1xxx)
    /// Name defined as both a module and an extern module
    E1001,
    /// Module defined twice
    E1002,
    /// Port has no block argument or terminator operand
    E1003,

    // Debug annotations (E2xxx)
    /// Scope reference not defined by a `dbg.scope` of the same module
    E2001,
    /// Enum reference not defined by a `dbg.enumdef` of the same module
    E2002,
    /// More than one `dbg.moduleinfo` in a module
    E2003,
}

impl ErrorCode {
    /// All codes, in numeric order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
        }
    }

    /// One-line summary.
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::E1001 => "module declared with conflicting kinds",
            ErrorCode::E1002 => "module defined more than once",
            ErrorCode::E1003 => "port has no corresponding value in the module body",
            ErrorCode::E2001 => "unresolved debug scope reference",
            ErrorCode::E2002 => "enum reference is not an enum definition of the same module",
            ErrorCode::E2003 => "duplicate module info annotation",
        }
    }

    /// Parse `"E2001"` back into a code.
    pub fn parse(s: &str) -> Option<ErrorCode> {
        ErrorCode::ALL.iter().copied().find(|code| code.as_str() == s)
    }

    /// Returns `true` for codes about debug annotations (as opposed to the
    /// hardware structure itself).
    pub fn is_annotation_error(self) -> bool {
        self.as_str().starts_with("E2")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
